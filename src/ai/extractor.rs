//! Rule-based extraction of travel fields from free text
//!
//! The backup path when model-assisted extraction is unavailable or its
//! reply cannot be parsed: an ordered set of keyword tests assigns each
//! field independently, with fixed defaults when nothing matches.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;

use crate::models::ParsedVoiceInfo;

/// Days from "today" to the default start date
const DEFAULT_START_OFFSET_DAYS: i64 = 7;
/// Trip length implied by the default dates
const DEFAULT_TRIP_LENGTH_DAYS: i64 = 5;

static BUDGET_TEN_THOUSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[1-9]万").expect("valid budget regex"));
static BUDGET_THOUSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[2-5]千").expect("valid budget regex"));

/// Extract structured travel fields from raw text, using today's date for
/// the default date derivation.
#[must_use]
pub fn extract(text: &str) -> ParsedVoiceInfo {
    extract_at(text, Utc::now().date_naive())
}

/// Extract structured travel fields with an explicit reference date.
///
/// The rule-based path never derives dates from the text: the start date is
/// always `today + 7` and the end date `start + 5`.
#[must_use]
pub fn extract_at(text: &str, today: NaiveDate) -> ParsedVoiceInfo {
    let (start_date, end_date) = default_dates(today);

    ParsedVoiceInfo {
        destination: extract_destination(text),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        budget: extract_budget(text),
        traveler_count: extract_traveler_count(text),
        preferences: extract_preferences(text),
        travel_type: extract_travel_type(text),
        special_requirements: extract_special_requirements(text),
    }
}

/// Default date pair: today+7 for the start, start+5 for the end
#[must_use]
pub fn default_dates(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today + Duration::days(DEFAULT_START_OFFSET_DAYS);
    (start, start + Duration::days(DEFAULT_TRIP_LENGTH_DAYS))
}

// Known destinations, tested in priority order
fn extract_destination(text: &str) -> String {
    if text.contains("日本") || text.contains("东京") {
        return "日本东京".to_string();
    }
    if text.contains("三亚") {
        return "海南三亚".to_string();
    }
    if text.contains("成都") {
        return "四川成都".to_string();
    }
    if text.contains("上海") {
        return "上海".to_string();
    }
    if text.contains("北京") {
        return "北京".to_string();
    }
    "未知目的地".to_string()
}

fn extract_budget(text: &str) -> f64 {
    if BUDGET_TEN_THOUSAND.is_match(text) {
        return 10000.0;
    }
    if BUDGET_THOUSAND.is_match(text) {
        return 3000.0;
    }
    5000.0
}

fn extract_traveler_count(text: &str) -> u32 {
    if text.contains("一家") || text.contains("带孩子") {
        return 3;
    }
    if text.contains("两个") || text.contains("两人") {
        return 2;
    }
    if text.contains("一个") || text.contains("独自") {
        return 1;
    }
    2
}

// Each keyword maps to one preference once, so the fixed scan order also
// rules out duplicates.
fn extract_preferences(text: &str) -> Vec<String> {
    let mut preferences = Vec::new();
    if text.contains("美食") || text.contains("吃") {
        preferences.push("美食".to_string());
    }
    if text.contains("动漫") {
        preferences.push("动漫".to_string());
    }
    if text.contains("购物") {
        preferences.push("购物".to_string());
    }
    if text.contains("文化") {
        preferences.push("文化".to_string());
    }
    if text.contains("海滩") || text.contains("海边") {
        preferences.push("海滩".to_string());
    }
    if preferences.is_empty() {
        preferences.push("观光".to_string());
    }
    preferences
}

fn extract_travel_type(text: &str) -> String {
    if text.contains("家庭") || text.contains("带孩子") {
        return "家庭游".to_string();
    }
    if text.contains("情侣") {
        return "情侣游".to_string();
    }
    if text.contains("朋友") {
        return "朋友游".to_string();
    }
    if text.contains("独自") {
        return "个人游".to_string();
    }
    "休闲游".to_string()
}

fn extract_special_requirements(text: &str) -> String {
    if text.contains("带孩子") {
        return "需要儿童友好设施".to_string();
    }
    if text.contains("老人") {
        return "需要无障碍设施".to_string();
    }
    "无特殊需求".to_string()
}
