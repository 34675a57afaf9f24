//! Budget summary derivation
//!
//! Pure arithmetic over a total budget: daily and per-person figures plus
//! the fixed-ratio allocation across the five spending categories.

use crate::TripAiError;
use crate::models::{BudgetAllocation, BudgetSummary};

/// Assumed trip length when the request does not pin one down
pub const DEFAULT_TRIP_DAYS: u32 = 5;

pub const TRANSPORTATION_RATIO: f64 = 0.30;
pub const ACCOMMODATION_RATIO: f64 = 0.35;
pub const FOOD_RATIO: f64 = 0.20;
pub const ATTRACTIONS_RATIO: f64 = 0.10;
pub const SHOPPING_RATIO: f64 = 0.05;

/// Compute the fixed-ratio allocation for a total budget
#[must_use]
pub fn recommended_allocation(total_budget: f64) -> BudgetAllocation {
    BudgetAllocation {
        transportation: total_budget * TRANSPORTATION_RATIO,
        accommodation: total_budget * ACCOMMODATION_RATIO,
        food: total_budget * FOOD_RATIO,
        attractions: total_budget * ATTRACTIONS_RATIO,
        shopping: total_budget * SHOPPING_RATIO,
    }
}

/// Derive the budget summary for a trip.
///
/// `traveler_count` must be at least 1 and `assumed_days` at least 1;
/// a zero count is a validation error, never a silent infinity.
pub fn summarize(
    total_budget: f64,
    traveler_count: u32,
    assumed_days: u32,
) -> crate::Result<BudgetSummary> {
    if traveler_count == 0 {
        return Err(TripAiError::validation(
            "traveler count must be at least 1 to derive a per-person budget",
        ));
    }
    if assumed_days == 0 {
        return Err(TripAiError::validation("assumed trip days must be at least 1"));
    }

    Ok(BudgetSummary {
        total_budget,
        daily_budget: total_budget / f64::from(assumed_days),
        per_person_budget: total_budget / f64::from(traveler_count),
        recommended_allocation: recommended_allocation(total_budget),
    })
}
