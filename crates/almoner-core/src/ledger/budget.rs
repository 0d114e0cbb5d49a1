use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::month::MonthKey;

/// One month's category allocations. Non-positive amounts are never stored:
/// an unset category and a zero allocation are the same state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MonthlyBudget {
    allocations: BTreeMap<String, f64>,
}

impl MonthlyBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: &str, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.allocations.insert(category.to_string(), amount);
        } else {
            self.allocations.remove(category);
        }
    }

    pub fn get(&self, category: &str) -> f64 {
        self.allocations.get(category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.allocations
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.allocations.values().sum()
    }
}

impl From<BTreeMap<String, f64>> for MonthlyBudget {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let mut budget = Self::new();
        for (category, amount) in raw {
            budget.set(&category, amount);
        }
        budget
    }
}

impl From<MonthlyBudget> for BTreeMap<String, f64> {
    fn from(budget: MonthlyBudget) -> Self {
        budget.allocations
    }
}

pub trait BudgetStore {
    fn get(&self, month: MonthKey) -> MonthlyBudget;

    /// Replaces the month's allocations; entries with amount `<= 0` are dropped.
    fn set(&mut self, month: MonthKey, allocations: BTreeMap<String, f64>);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryBudgets {
    months: BTreeMap<MonthKey, MonthlyBudget>,
}

impl MemoryBudgets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BudgetStore for MemoryBudgets {
    fn get(&self, month: MonthKey) -> MonthlyBudget {
        self.months.get(&month).cloned().unwrap_or_default()
    }

    fn set(&mut self, month: MonthKey, allocations: BTreeMap<String, f64>) {
        let budget = MonthlyBudget::from(allocations);
        if budget.is_empty() {
            self.months.remove(&month);
        } else {
            self.months.insert(month, budget);
        }
        tracing::info!(%month, "stored monthly budget");
    }
}
