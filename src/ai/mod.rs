//! AI itinerary pipeline: prompt construction, model call, fallback
//!
//! The planner wires the prompt builder, the text-generation client, the
//! deterministic fallback generator, the rule-based extractor and the
//! budget summarizer into the two operations the rest of the backend
//! consumes. Model failures are substituted locally and logged at WARN;
//! only unexpected top-level failures propagate as errors.

pub mod budget;
pub mod client;
pub mod extractor;
pub mod fallback;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::DefaultsConfig;
use crate::models::{BudgetSummary, ItineraryResult, ParsedVoiceInfo, TravelRequest};

pub use client::{GenerationOutcome, QwenClient, TextGenerator, UnavailableReason};
pub use prompt::PromptBuilder;

/// Result of the voice-plan pipeline: the parsed fields, the generated
/// itinerary and the derived budget summary.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VoicePlanResult {
    pub parsed_info: ParsedVoiceInfo,
    pub itinerary: String,
    pub summary: BudgetSummary,
}

/// The itinerary-generation service.
///
/// Collaborators arrive through the constructor; there is no ambient
/// registry anywhere in the pipeline.
pub struct AiPlanner {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    defaults: DefaultsConfig,
}

impl AiPlanner {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, defaults: DefaultsConfig) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            defaults,
        }
    }

    /// Generate an itinerary for a structured request.
    ///
    /// Always returns non-empty text: when the model is unavailable the
    /// deterministic fallback template is substituted.
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn generate_itinerary(&self, request: &TravelRequest) -> crate::Result<String> {
        request.validate()?;

        let prompt = self.prompts.itinerary_prompt(request);
        match self.generator.generate(&prompt).await {
            GenerationOutcome::Generated(text) => Ok(text),
            GenerationOutcome::Unavailable(reason) => {
                // Silent degradation: the caller still gets an itinerary,
                // but operators can tell this apart from a real failure.
                warn!("Model unavailable ({reason}), using fallback itinerary template");
                Ok(fallback::mock_itinerary(request))
            }
        }
    }

    /// Generate an itinerary together with its budget summary.
    pub async fn generate_result(&self, request: &TravelRequest) -> crate::Result<ItineraryResult> {
        let itinerary = self.generate_itinerary(request).await?;
        let summary = budget::summarize(
            request.budget,
            request.traveler_count,
            self.defaults.trip_days,
        )?;
        Ok(ItineraryResult { itinerary, summary })
    }

    /// Extract structured travel fields from free text.
    ///
    /// Tries the model-assisted path first; whenever the reply is missing
    /// or not parseable JSON, the rule-based extractor takes over. First
    /// successful path wins, there is no reconciliation between the two.
    #[instrument(skip(self, voice_text), fields(text_len = voice_text.len()))]
    pub async fn parse_travel_requirements(&self, voice_text: &str) -> ParsedVoiceInfo {
        let prompt = self.prompts.extraction_prompt(voice_text);
        match self.generator.generate(&prompt).await {
            GenerationOutcome::Generated(reply) => match extract_json(&reply) {
                Some(info) => {
                    debug!("Model-assisted extraction succeeded");
                    info
                }
                None => {
                    warn!("Model reply was not parseable JSON, using rule-based extraction");
                    extractor::extract(voice_text)
                }
            },
            GenerationOutcome::Unavailable(reason) => {
                warn!("Model unavailable ({reason}), using rule-based extraction");
                extractor::extract(voice_text)
            }
        }
    }

    /// The full voice pipeline: extract fields, generate the itinerary,
    /// derive the budget summary.
    #[instrument(skip(self, voice_text))]
    pub async fn parse_voice_and_generate_plan(
        &self,
        voice_text: &str,
    ) -> crate::Result<VoicePlanResult> {
        let parsed_info = self.parse_travel_requirements(voice_text).await;

        let request: TravelRequest = parsed_info.clone().into();
        let itinerary = self.generate_itinerary(&request).await?;

        let summary = budget::summarize(
            parsed_info.budget,
            parsed_info.traveler_count,
            self.defaults.trip_days,
        )?;

        Ok(VoicePlanResult {
            parsed_info,
            itinerary,
            summary,
        })
    }
}

/// Pull the first `{ ... }` span out of a model reply and parse it.
///
/// Models tend to wrap the JSON object in prose or code fences; the span
/// between the first `{` and the last `}` is what gets parsed.
fn extract_json(reply: &str) -> Option<ParsedVoiceInfo> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}
