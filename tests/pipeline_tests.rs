//! Integration tests for the itinerary pipeline
//!
//! The text-generation backend is stubbed so every scenario runs without
//! network access; the fallback and rule-based paths are the ones under
//! test here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use tripai::ai::{
    AiPlanner, GenerationOutcome, TextGenerator, UnavailableReason, budget, extractor,
};
use tripai::config::DefaultsConfig;
use tripai::models::TravelRequest;

/// A model endpoint that is always down
struct ModelDown;

#[async_trait]
impl TextGenerator for ModelDown {
    async fn generate(&self, _prompt: &str) -> GenerationOutcome {
        GenerationOutcome::Unavailable(UnavailableReason::Transport(
            "connection refused".to_string(),
        ))
    }
}

fn planner_with_model_down() -> AiPlanner {
    AiPlanner::new(Arc::new(ModelDown), DefaultsConfig::default())
}

fn tokyo_request() -> TravelRequest {
    TravelRequest {
        destination: "东京".to_string(),
        start_date: "2024-05-01".to_string(),
        end_date: "2024-05-06".to_string(),
        budget: 10000.0,
        traveler_count: 2,
        preferences: vec!["美食".to_string(), "购物".to_string()],
        travel_type: None,
        special_requirements: None,
    }
}

#[tokio::test]
async fn generate_itinerary_is_never_empty() {
    let planner = planner_with_model_down();
    let itinerary = planner.generate_itinerary(&tokyo_request()).await.unwrap();
    assert!(!itinerary.trim().is_empty());
}

#[tokio::test]
async fn fallback_itinerary_names_destination_once_per_day() {
    let planner = planner_with_model_down();
    let itinerary = planner.generate_itinerary(&tokyo_request()).await.unwrap();
    assert_eq!(itinerary.matches("东京").count(), 5);
}

#[tokio::test]
async fn fallback_itinerary_budget_section_uses_fixed_ratios() {
    let planner = planner_with_model_down();
    let itinerary = planner.generate_itinerary(&tokyo_request()).await.unwrap();

    // 10000 × {0.3, 0.35, 0.2, 0.1, 0.05}
    assert!(itinerary.contains("交通费用：30% (¥3000.00)"));
    assert!(itinerary.contains("住宿费用：35% (¥3500.00)"));
    assert!(itinerary.contains("餐饮费用：20% (¥2000.00)"));
    assert!(itinerary.contains("景点门票：10% (¥1000.00)"));
    assert!(itinerary.contains("购物娱乐：5% (¥500.00)"));
}

#[tokio::test]
async fn voice_pipeline_returns_full_triple() {
    let planner = planner_with_model_down();
    let result = planner
        .parse_voice_and_generate_plan("我们两个人想去东京，预算2万，喜欢美食和购物")
        .await
        .unwrap();

    assert_eq!(result.parsed_info.destination, "日本东京");
    assert_eq!(result.parsed_info.budget, 10000.0);
    assert_eq!(result.parsed_info.traveler_count, 2);
    assert_eq!(result.parsed_info.preferences, vec!["美食", "购物"]);

    assert!(!result.itinerary.is_empty());

    assert_eq!(result.summary.total_budget, 10000.0);
    assert_eq!(result.summary.daily_budget, 2000.0);
    assert_eq!(result.summary.per_person_budget, 5000.0);
    let allocation = &result.summary.recommended_allocation;
    assert!((allocation.total() - 10000.0).abs() < 1e-9);
}

#[test]
fn allocation_ratios_sum_to_one_for_any_budget() {
    for total in [1.0, 500.0, 9999.99, 1_000_000.0] {
        let allocation = budget::recommended_allocation(total);
        assert!((allocation.total() - total).abs() < 1e-6 * total);
    }
}

#[test]
fn zero_travelers_fails_with_defined_error() {
    let result = budget::summarize(10000.0, 0, 5);
    assert!(result.is_err());
}

#[test]
fn default_dates_are_today_plus_7_and_12() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let info = extractor::extract_at("随便走走", today);
    assert_eq!(info.start_date, "2024-01-08");
    assert_eq!(info.end_date, "2024-01-13");
}

#[test]
fn unknown_destination_gets_the_default() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let info = extractor::extract_at("找个地方散心", today);
    assert_eq!(info.destination, "未知目的地");
}
