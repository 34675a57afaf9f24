//! Data models for travel planning and the text-generation API
//!
//! This module contains all the data structures used for representing travel
//! requests, generated itineraries and budget summaries, including both the
//! internal models and the external API request/response envelopes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::TripAiError;

/// A structured travel request, constructed per call and never persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    /// Destination name (free text, e.g. "日本东京")
    pub destination: String,
    /// Trip start date, passed through to the prompt as given
    pub start_date: String,
    /// Trip end date, passed through to the prompt as given
    pub end_date: String,
    /// Total budget, must be positive
    pub budget: f64,
    /// Number of travelers, must be at least 1
    pub traveler_count: u32,
    /// Free-form travel preferences (non-unique)
    pub preferences: Vec<String>,
    /// Optional trip type, e.g. "家庭游"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_type: Option<String>,
    /// Optional special-requirements text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

impl TravelRequest {
    /// Check the numeric invariants before the request enters the pipeline
    pub fn validate(&self) -> crate::Result<()> {
        if self.destination.trim().is_empty() {
            return Err(TripAiError::validation("destination cannot be empty"));
        }
        if self.budget <= 0.0 {
            return Err(TripAiError::validation("budget must be positive"));
        }
        if self.traveler_count == 0 {
            return Err(TripAiError::validation("traveler count must be at least 1"));
        }
        Ok(())
    }

    /// Preferences joined for prompt interpolation
    #[must_use]
    pub fn preferences_text(&self) -> String {
        self.preferences.join(",")
    }
}

/// Structured fields extracted from a free-text ("voice") travel description.
///
/// Field names serialize to the exact JSON keys the extraction prompt asks
/// the model to return, so a parseable model reply deserializes directly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedVoiceInfo {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: f64,
    pub traveler_count: u32,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub travel_type: String,
    #[serde(default)]
    pub special_requirements: String,
}

impl From<ParsedVoiceInfo> for TravelRequest {
    fn from(info: ParsedVoiceInfo) -> Self {
        Self {
            destination: info.destination,
            start_date: info.start_date,
            end_date: info.end_date,
            budget: info.budget,
            traveler_count: info.traveler_count,
            preferences: info.preferences,
            travel_type: if info.travel_type.is_empty() {
                None
            } else {
                Some(info.travel_type)
            },
            special_requirements: if info.special_requirements.is_empty() {
                None
            } else {
                Some(info.special_requirements)
            },
        }
    }
}

/// Fixed-ratio budget allocation across the five spending categories.
///
/// Category names and order are part of the type; ratios live in
/// [`crate::ai::budget`] and sum to 1.0.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BudgetAllocation {
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub attractions: f64,
    pub shopping: f64,
}

impl BudgetAllocation {
    /// Sum of all category amounts
    #[must_use]
    pub fn total(&self) -> f64 {
        self.transportation + self.accommodation + self.food + self.attractions + self.shopping
    }
}

/// Derived budget figures returned alongside a generated itinerary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: f64,
    /// Total divided by the assumed trip length (default 5 days)
    pub daily_budget: f64,
    /// Total divided by the traveler count
    pub per_person_budget: f64,
    pub recommended_allocation: BudgetAllocation,
}

/// A generated itinerary with its budget summary, immutable after creation.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    pub itinerary: String,
    pub summary: BudgetSummary,
}

/// A persisted travel plan owned by a user.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    /// Record id, assigned by the store on save
    pub id: u64,
    /// Owning user id
    pub user_id: u64,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub traveler_count: u32,
    pub preferences: Vec<String>,
    /// Generated itinerary text
    pub itinerary: String,
    pub created_at: DateTime<Utc>,
}

/// A recorded expense against a travel plan.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Record id, assigned by the store on save
    pub id: u64,
    /// Travel plan this expense belongs to
    pub plan_id: u64,
    /// Spending category (交通, 住宿, 餐饮, 景点, ...)
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub expense_date: DateTime<Utc>,
}

/// DashScope text-generation API envelopes
pub mod dashscope {
    use serde::{Deserialize, Serialize};

    /// Request envelope for the text-generation endpoint
    #[derive(Debug, Serialize)]
    pub struct GenerationRequest {
        pub model: String,
        pub input: Input,
        pub parameters: Parameters,
    }

    #[derive(Debug, Serialize)]
    pub struct Input {
        pub prompt: String,
    }

    /// Sampling parameters, fixed by the backend
    #[derive(Debug, Serialize)]
    pub struct Parameters {
        pub result_format: String,
        pub top_p: f64,
        pub temperature: f64,
    }

    impl Default for Parameters {
        fn default() -> Self {
            Self {
                result_format: "text".to_string(),
                top_p: 0.8,
                temperature: 0.7,
            }
        }
    }

    impl GenerationRequest {
        #[must_use]
        pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
            Self {
                model: model.into(),
                input: Input {
                    prompt: prompt.into(),
                },
                parameters: Parameters::default(),
            }
        }
    }

    /// Response envelope from the text-generation endpoint
    #[derive(Debug, Deserialize)]
    pub struct GenerationResponse {
        pub output: Option<Output>,
        pub usage: Option<Usage>,
        pub request_id: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Output {
        pub text: Option<String>,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Usage {
        pub input_tokens: Option<u32>,
        pub output_tokens: Option<u32>,
    }
}
