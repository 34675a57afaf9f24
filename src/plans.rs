//! Travel-plan and expense operations
//!
//! Every operation takes the caller's [`Principal`] as an explicit
//! parameter and enforces ownership against the stored record before
//! touching it. Plan creation runs the itinerary pipeline so a saved plan
//! always carries generated text.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::TripAiError;
use crate::ai::AiPlanner;
use crate::auth::Principal;
use crate::models::{Expense, TravelPlan, TravelRequest};
use crate::storage::{ExpenseStore, TravelPlanStore};

/// Fields a caller supplies to create a plan
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTravelPlan {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub traveler_count: u32,
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// Fields a caller supplies to record an expense
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub plan_id: u64,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

/// Updatable expense fields
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub category: String,
    pub description: String,
    pub amount: f64,
}

/// Plan and expense operations over the storage contracts
pub struct PlanService {
    plans: Arc<dyn TravelPlanStore>,
    expenses: Arc<dyn ExpenseStore>,
    planner: Arc<AiPlanner>,
}

impl PlanService {
    #[must_use]
    pub fn new(
        plans: Arc<dyn TravelPlanStore>,
        expenses: Arc<dyn ExpenseStore>,
        planner: Arc<AiPlanner>,
    ) -> Self {
        Self {
            plans,
            expenses,
            planner,
        }
    }

    /// Create a plan: generate the itinerary, then persist.
    #[instrument(skip(self, new_plan), fields(user = %principal.username, destination = %new_plan.destination))]
    pub async fn create_plan(
        &self,
        principal: &Principal,
        new_plan: NewTravelPlan,
    ) -> crate::Result<TravelPlan> {
        let request = TravelRequest {
            destination: new_plan.destination.clone(),
            start_date: new_plan.start_date.to_string(),
            end_date: new_plan.end_date.to_string(),
            budget: new_plan.budget,
            traveler_count: new_plan.traveler_count,
            preferences: new_plan.preferences.clone(),
            travel_type: None,
            special_requirements: None,
        };
        let itinerary = self.planner.generate_itinerary(&request).await?;

        let plan = TravelPlan {
            id: 0,
            user_id: principal.user_id,
            destination: new_plan.destination,
            start_date: new_plan.start_date,
            end_date: new_plan.end_date,
            budget: new_plan.budget,
            traveler_count: new_plan.traveler_count,
            preferences: new_plan.preferences,
            itinerary,
            created_at: Utc::now(),
        };
        let plan = self.plans.save(plan).await?;
        info!("Created travel plan {}", plan.id);
        Ok(plan)
    }

    /// Persist an already-generated plan (the voice pipeline produces its
    /// own itinerary before saving).
    pub async fn save_generated_plan(&self, plan: TravelPlan) -> crate::Result<TravelPlan> {
        self.plans.save(plan).await
    }

    /// All plans owned by the caller
    pub async fn list_plans(&self, principal: &Principal) -> crate::Result<Vec<TravelPlan>> {
        self.plans.find_by_owner(principal.user_id).await
    }

    /// Fetch a single plan, enforcing ownership
    pub async fn get_plan(&self, principal: &Principal, plan_id: u64) -> crate::Result<TravelPlan> {
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| TripAiError::not_found(format!("travel plan {plan_id} does not exist")))?;
        if plan.user_id != principal.user_id {
            return Err(TripAiError::forbidden(format!(
                "travel plan {plan_id} is not owned by {}",
                principal.username
            )));
        }
        Ok(plan)
    }

    /// Delete a plan the caller owns
    #[instrument(skip(self), fields(user = %principal.username))]
    pub async fn delete_plan(&self, principal: &Principal, plan_id: u64) -> crate::Result<()> {
        self.get_plan(principal, plan_id).await?;
        self.plans.delete(plan_id).await
    }

    /// Search the caller's plans by destination substring; an empty query
    /// lists everything the caller owns.
    pub async fn search_plans(
        &self,
        principal: &Principal,
        destination: Option<&str>,
    ) -> crate::Result<Vec<TravelPlan>> {
        match destination.map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let plans = self.plans.find_by_destination(needle).await?;
                Ok(plans
                    .into_iter()
                    .filter(|plan| plan.user_id == principal.user_id)
                    .collect())
            }
            _ => self.list_plans(principal).await,
        }
    }

    /// Expenses for a plan the caller owns
    pub async fn list_expenses(
        &self,
        principal: &Principal,
        plan_id: u64,
    ) -> crate::Result<Vec<Expense>> {
        self.get_plan(principal, plan_id).await?;
        self.expenses.find_by_plan(plan_id).await
    }

    /// Record an expense against a plan the caller owns
    #[instrument(skip(self, new_expense), fields(user = %principal.username, plan = new_expense.plan_id))]
    pub async fn add_expense(
        &self,
        principal: &Principal,
        new_expense: NewExpense,
    ) -> crate::Result<Expense> {
        if new_expense.amount <= 0.0 {
            return Err(TripAiError::validation("expense amount must be positive"));
        }
        self.get_plan(principal, new_expense.plan_id).await?;

        let expense = Expense {
            id: 0,
            plan_id: new_expense.plan_id,
            category: new_expense.category,
            description: new_expense.description,
            amount: new_expense.amount,
            expense_date: Utc::now(),
        };
        self.expenses.save(expense).await
    }

    /// Update an expense on a plan the caller owns
    pub async fn update_expense(
        &self,
        principal: &Principal,
        expense_id: u64,
        update: ExpenseUpdate,
    ) -> crate::Result<Expense> {
        if update.amount <= 0.0 {
            return Err(TripAiError::validation("expense amount must be positive"));
        }
        let mut expense = self
            .expenses
            .find_by_id(expense_id)
            .await?
            .ok_or_else(|| TripAiError::not_found(format!("expense {expense_id} does not exist")))?;
        self.get_plan(principal, expense.plan_id).await?;

        expense.category = update.category;
        expense.description = update.description;
        expense.amount = update.amount;
        self.expenses.save(expense).await
    }

    /// Delete an expense on a plan the caller owns
    pub async fn delete_expense(
        &self,
        principal: &Principal,
        expense_id: u64,
    ) -> crate::Result<()> {
        let expense = self
            .expenses
            .find_by_id(expense_id)
            .await?
            .ok_or_else(|| TripAiError::not_found(format!("expense {expense_id} does not exist")))?;
        self.get_plan(principal, expense.plan_id).await?;
        self.expenses.delete(expense_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerationOutcome, TextGenerator, UnavailableReason};
    use crate::config::DefaultsConfig;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _prompt: &str) -> GenerationOutcome {
            GenerationOutcome::Unavailable(UnavailableReason::NotConfigured)
        }
    }

    fn service() -> PlanService {
        let store = Arc::new(MemoryStore::new());
        let planner = Arc::new(AiPlanner::new(
            Arc::new(Unreachable),
            DefaultsConfig::default(),
        ));
        PlanService::new(store.clone(), store, planner)
    }

    fn alice() -> Principal {
        Principal {
            user_id: 1,
            username: "alice".to_string(),
        }
    }

    fn bob() -> Principal {
        Principal {
            user_id: 2,
            username: "bob".to_string(),
        }
    }

    fn new_plan(destination: &str) -> NewTravelPlan {
        NewTravelPlan {
            destination: destination.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            budget: 10000.0,
            traveler_count: 2,
            preferences: vec!["美食".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_plan_generates_itinerary() {
        let service = service();
        let plan = service.create_plan(&alice(), new_plan("东京")).await.unwrap();
        assert!(plan.id > 0);
        assert!(!plan.itinerary.is_empty());
        assert!(plan.itinerary.contains("东京"));
    }

    #[tokio::test]
    async fn test_ownership_check_on_get() {
        let service = service();
        let plan = service.create_plan(&alice(), new_plan("东京")).await.unwrap();

        assert!(service.get_plan(&alice(), plan.id).await.is_ok());
        assert!(matches!(
            service.get_plan(&bob(), plan.id).await,
            Err(TripAiError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing_plan_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_plan(&alice(), 99).await,
            Err(TripAiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_scopes_to_owner() {
        let service = service();
        service.create_plan(&alice(), new_plan("日本东京")).await.unwrap();
        service.create_plan(&bob(), new_plan("日本东京")).await.unwrap();

        let found = service.search_plans(&alice(), Some("东京")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, 1);

        let all = service.search_plans(&alice(), None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_expense_lifecycle() {
        let service = service();
        let plan = service.create_plan(&alice(), new_plan("东京")).await.unwrap();

        let expense = service
            .add_expense(
                &alice(),
                NewExpense {
                    plan_id: plan.id,
                    category: "餐饮".to_string(),
                    description: "晚餐".to_string(),
                    amount: 200.0,
                },
            )
            .await
            .unwrap();

        let updated = service
            .update_expense(
                &alice(),
                expense.id,
                ExpenseUpdate {
                    category: "餐饮".to_string(),
                    description: "晚餐和甜点".to_string(),
                    amount: 260.0,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, 260.0);

        service.delete_expense(&alice(), expense.id).await.unwrap();
        assert!(service
            .list_expenses(&alice(), plan.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_expense_on_foreign_plan_is_forbidden() {
        let service = service();
        let plan = service.create_plan(&alice(), new_plan("东京")).await.unwrap();

        let result = service
            .add_expense(
                &bob(),
                NewExpense {
                    plan_id: plan.id,
                    category: "交通".to_string(),
                    description: "出租车".to_string(),
                    amount: 50.0,
                },
            )
            .await;
        assert!(matches!(result, Err(TripAiError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_nonpositive_expense_amount_rejected() {
        let service = service();
        let plan = service.create_plan(&alice(), new_plan("东京")).await.unwrap();

        let result = service
            .add_expense(
                &alice(),
                NewExpense {
                    plan_id: plan.id,
                    category: "交通".to_string(),
                    description: "退款".to_string(),
                    amount: 0.0,
                },
            )
            .await;
        assert!(matches!(result, Err(TripAiError::Validation { .. })));
    }
}
