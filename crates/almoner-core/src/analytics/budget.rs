use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::math::percent_of;
use crate::ledger::{MonthKey, MonthlyBudget, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetVarianceLine {
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    /// Positive when under budget, negative when overspent.
    pub variance: f64,
    pub variance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetVarianceReport {
    pub month: MonthKey,
    pub lines: Vec<BudgetVarianceLine>,
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub total_variance: f64,
}

/// Compares one month's allocations against expense activity in that month.
///
/// Every allocated category gets a line. Categories that saw expense activity
/// without an allocation are reported with `budgeted = 0`. Lines are ordered
/// by absolute variance, largest first.
pub fn compare_budget(
    transactions: &[Transaction],
    month: MonthKey,
    allocations: &MonthlyBudget,
) -> BudgetVarianceReport {
    let mut actual_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for row in transactions
        .iter()
        .filter(|row| row.is_expense() && month.contains(row.date))
    {
        *actual_by_category.entry(row.category.as_str()).or_insert(0.0) += row.amount;
    }
    tracing::debug!(
        month = %month,
        allocated = allocations.len(),
        spent_categories = actual_by_category.len(),
        "comparing budget"
    );

    let mut lines = Vec::new();
    for (category, budgeted) in allocations.iter() {
        let actual = actual_by_category.remove(category).unwrap_or(0.0);
        lines.push(variance_line(category, budgeted, actual));
    }
    for (category, actual) in actual_by_category {
        lines.push(variance_line(category, 0.0, actual));
    }
    lines.sort_by(|left, right| {
        right
            .variance
            .abs()
            .total_cmp(&left.variance.abs())
            .then_with(|| left.category.cmp(&right.category))
    });

    let total_budgeted = allocations.total();
    let total_actual = lines.iter().map(|line| line.actual).sum::<f64>();
    BudgetVarianceReport {
        month,
        lines,
        total_budgeted,
        total_actual,
        total_variance: total_budgeted - total_actual,
    }
}

fn variance_line(category: &str, budgeted: f64, actual: f64) -> BudgetVarianceLine {
    let variance = budgeted - actual;
    BudgetVarianceLine {
        category: category.to_string(),
        budgeted,
        actual,
        variance,
        variance_percentage: percent_of(variance, budgeted),
    }
}
