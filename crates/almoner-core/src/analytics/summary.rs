use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::math::{percent_change, percent_of};
use crate::analytics::policy::{ANALYTICS_POLICY_V1, AnalyticsPolicy};
use crate::ledger::{DateRange, MonthKey, Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrowthRate {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub transaction_count: usize,
    /// Net income divided by transaction count, not the mean ticket size.
    pub average_transaction: f64,
    pub monthly_trends: Vec<MonthlyBucket>,
    pub category_breakdown: Vec<CategoryShare>,
    pub top_categories: Vec<CategoryShare>,
    pub growth_rate: GrowthRate,
}

pub fn compute_summary(transactions: &[Transaction], range: Option<DateRange>) -> LedgerSummary {
    compute_summary_with_policy(transactions, range, ANALYTICS_POLICY_V1)
}

fn compute_summary_with_policy(
    transactions: &[Transaction],
    range: Option<DateRange>,
    policy: AnalyticsPolicy,
) -> LedgerSummary {
    let in_range = transactions
        .iter()
        .filter(|row| range.is_none_or(|window| window.contains(row.date)))
        .collect::<Vec<&Transaction>>();
    tracing::debug!(
        input = transactions.len(),
        in_range = in_range.len(),
        "computing ledger summary"
    );

    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    for row in &in_range {
        match row.transaction_type {
            TransactionType::Income => total_income += row.amount,
            TransactionType::Expense => total_expenses += row.amount,
        }
    }
    let net_income = total_income - total_expenses;
    let transaction_count = in_range.len();
    let average_transaction = if transaction_count == 0 {
        0.0
    } else {
        net_income / transaction_count as f64
    };

    let monthly_trends = monthly_buckets(&in_range, policy.trend_window_months);
    let category_breakdown = category_breakdown(&in_range, total_income + total_expenses);
    let top_categories = category_breakdown
        .iter()
        .take(policy.top_categories)
        .cloned()
        .collect::<Vec<CategoryShare>>();
    let growth_rate = growth_rate(&monthly_trends);

    LedgerSummary {
        total_income,
        total_expenses,
        net_income,
        transaction_count,
        average_transaction,
        monthly_trends,
        category_breakdown,
        top_categories,
        growth_rate,
    }
}

fn monthly_buckets(rows: &[&Transaction], window: usize) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<MonthKey, MonthlyBucket> = BTreeMap::new();
    for row in rows {
        let month = row.month();
        let bucket = buckets.entry(month).or_insert_with(|| MonthlyBucket {
            month,
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
            transaction_count: 0,
        });
        match row.transaction_type {
            TransactionType::Income => bucket.income += row.amount,
            TransactionType::Expense => bucket.expenses += row.amount,
        }
        bucket.transaction_count += 1;
    }

    let mut ordered = buckets
        .into_values()
        .map(|mut bucket| {
            bucket.net = bucket.income - bucket.expenses;
            bucket
        })
        .collect::<Vec<MonthlyBucket>>();
    if ordered.len() > window {
        ordered.drain(..ordered.len() - window);
    }
    ordered
}

/// One share per category and type, so a name used on both sides of the
/// ledger (the ingestion fallback `Other`) yields an income row and an
/// expense row.
fn category_breakdown(rows: &[&Transaction], grand_total: f64) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<(&str, TransactionType), f64> = BTreeMap::new();
    for row in rows {
        *by_category
            .entry((row.category.as_str(), row.transaction_type))
            .or_insert(0.0) += row.amount;
    }

    let mut shares = by_category
        .into_iter()
        .map(|((category, transaction_type), amount)| CategoryShare {
            category: category.to_string(),
            amount,
            transaction_type,
            percentage: percent_of(amount, grand_total),
        })
        .collect::<Vec<CategoryShare>>();
    shares.sort_by(|left, right| {
        right
            .amount
            .total_cmp(&left.amount)
            .then_with(|| left.category.cmp(&right.category))
            .then_with(|| left.transaction_type.cmp(&right.transaction_type))
    });
    shares
}

fn growth_rate(trends: &[MonthlyBucket]) -> GrowthRate {
    let [.., previous, current] = trends else {
        return GrowthRate::default();
    };
    GrowthRate {
        income: percent_change(previous.income, current.income),
        expenses: percent_change(previous.expenses, current.expenses),
        net: percent_change(previous.net, current.net),
    }
}
