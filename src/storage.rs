//! Storage contracts for travel plans and expenses
//!
//! The backend consumes a save/find-by-id/find-by-owner contract and does
//! not implement a database itself. The in-memory implementation backs the
//! server by default and every test.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Expense, TravelPlan};

/// Persistence contract for travel plans
#[async_trait]
pub trait TravelPlanStore: Send + Sync {
    /// Save a plan; an id of 0 means "assign one". Returns the stored plan.
    async fn save(&self, plan: TravelPlan) -> crate::Result<TravelPlan>;
    async fn find_by_id(&self, id: u64) -> crate::Result<Option<TravelPlan>>;
    /// All plans owned by a user, newest first
    async fn find_by_owner(&self, user_id: u64) -> crate::Result<Vec<TravelPlan>>;
    /// Case-insensitive destination substring search
    async fn find_by_destination(&self, destination: &str) -> crate::Result<Vec<TravelPlan>>;
    async fn delete(&self, id: u64) -> crate::Result<()>;
}

/// Persistence contract for expenses
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Save an expense; an id of 0 means "assign one"
    async fn save(&self, expense: Expense) -> crate::Result<Expense>;
    async fn find_by_id(&self, id: u64) -> crate::Result<Option<Expense>>;
    async fn find_by_plan(&self, plan_id: u64) -> crate::Result<Vec<Expense>>;
    async fn delete(&self, id: u64) -> crate::Result<()>;
}

/// In-memory store for both record types
pub struct MemoryStore {
    plans: RwLock<HashMap<u64, TravelPlan>>,
    expenses: RwLock<HashMap<u64, Expense>>,
    next_plan_id: AtomicU64,
    next_expense_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            expenses: RwLock::new(HashMap::new()),
            next_plan_id: AtomicU64::new(1),
            next_expense_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl TravelPlanStore for MemoryStore {
    async fn save(&self, mut plan: TravelPlan) -> crate::Result<TravelPlan> {
        if plan.id == 0 {
            plan.id = self.next_plan_id.fetch_add(1, Ordering::Relaxed);
        }
        self.plans.write().await.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: u64) -> crate::Result<Option<TravelPlan>> {
        Ok(self.plans.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, user_id: u64) -> crate::Result<Vec<TravelPlan>> {
        let mut plans: Vec<TravelPlan> = self
            .plans
            .read()
            .await
            .values()
            .filter(|plan| plan.user_id == user_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(plans)
    }

    async fn find_by_destination(&self, destination: &str) -> crate::Result<Vec<TravelPlan>> {
        let needle = destination.to_lowercase();
        let mut plans: Vec<TravelPlan> = self
            .plans
            .read()
            .await
            .values()
            .filter(|plan| plan.destination.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(plans)
    }

    async fn delete(&self, id: u64) -> crate::Result<()> {
        self.plans.write().await.remove(&id);
        // Expenses hang off the plan, drop them with it
        self.expenses
            .write()
            .await
            .retain(|_, expense| expense.plan_id != id);
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn save(&self, mut expense: Expense) -> crate::Result<Expense> {
        if expense.id == 0 {
            expense.id = self.next_expense_id.fetch_add(1, Ordering::Relaxed);
        }
        self.expenses
            .write()
            .await
            .insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn find_by_id(&self, id: u64) -> crate::Result<Option<Expense>> {
        Ok(self.expenses.read().await.get(&id).cloned())
    }

    async fn find_by_plan(&self, plan_id: u64) -> crate::Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .read()
            .await
            .values()
            .filter(|expense| expense.plan_id == plan_id)
            .cloned()
            .collect();
        expenses.sort_by_key(|expense| expense.id);
        Ok(expenses)
    }

    async fn delete(&self, id: u64) -> crate::Result<()> {
        self.expenses.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn plan_for(user_id: u64, destination: &str) -> TravelPlan {
        TravelPlan {
            id: 0,
            user_id,
            destination: destination.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            budget: 10000.0,
            traveler_count: 2,
            preferences: vec!["美食".to_string()],
            itinerary: "行程".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let store = MemoryStore::new();
        let first = TravelPlanStore::save(&store, plan_for(1, "东京")).await.unwrap();
        let second = TravelPlanStore::save(&store, plan_for(1, "北京")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_find_by_owner_filters() {
        let store = MemoryStore::new();
        TravelPlanStore::save(&store, plan_for(1, "东京")).await.unwrap();
        TravelPlanStore::save(&store, plan_for(2, "北京")).await.unwrap();

        let plans = store.find_by_owner(1).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].destination, "东京");
    }

    #[tokio::test]
    async fn test_destination_search_is_substring() {
        let store = MemoryStore::new();
        TravelPlanStore::save(&store, plan_for(1, "日本东京")).await.unwrap();
        TravelPlanStore::save(&store, plan_for(1, "海南三亚")).await.unwrap();

        let plans = store.find_by_destination("东京").await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].destination, "日本东京");
    }

    #[tokio::test]
    async fn test_delete_plan_drops_expenses() {
        let store = MemoryStore::new();
        let plan = TravelPlanStore::save(&store, plan_for(1, "东京")).await.unwrap();
        ExpenseStore::save(
            &store,
            Expense {
                id: 0,
                plan_id: plan.id,
                category: "餐饮".to_string(),
                description: "晚餐".to_string(),
                amount: 200.0,
                expense_date: Utc::now(),
            },
        )
        .await
        .unwrap();

        TravelPlanStore::delete(&store, plan.id).await.unwrap();
        assert!(store.find_by_plan(plan.id).await.unwrap().is_empty());
    }
}
