//! `TripAI` - AI-assisted travel planning backend
//!
//! This library provides the core functionality for itinerary generation
//! via an external text-generation model with deterministic fallback,
//! free-text travel-requirement extraction, and travel-plan management.

pub mod ai;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod plans;
pub mod storage;
pub mod web;

// Re-export core types for public API
pub use ai::{AiPlanner, GenerationOutcome, PromptBuilder, QwenClient, TextGenerator, VoicePlanResult};
pub use auth::{Principal, PrincipalResolver, StaticTokenResolver};
pub use config::TripAiConfig;
pub use error::TripAiError;
pub use models::{BudgetSummary, ItineraryResult, ParsedVoiceInfo, TravelPlan, TravelRequest};
pub use plans::PlanService;
pub use storage::{ExpenseStore, MemoryStore, TravelPlanStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripAiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
