use almoner_core::analytics::{LedgerSummary, compute_summary};
use almoner_core::ledger::{Transaction, TransactionType};
use chrono::{Datelike, Months, NaiveDate};

const CATEGORIES: [(&str, TransactionType); 6] = [
    ("Tithes", TransactionType::Income),
    ("Offerings", TransactionType::Income),
    ("Other", TransactionType::Income),
    ("Utilities", TransactionType::Expense),
    ("Salaries", TransactionType::Expense),
    ("Other", TransactionType::Expense),
];

/// Linear congruential steps; the battery only needs repeatable variety.
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn generated_ledger(seed: u64, rows: usize, span_months: u32) -> Vec<Transaction> {
    let mut sequence = Sequence(seed);
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN);
    (0..rows)
        .map(|index| {
            let month_offset = sequence.next(u64::from(span_months)) as u32;
            let day = sequence.next(28) as u32;
            let date = start
                .checked_add_months(Months::new(month_offset))
                .and_then(|first| first.with_day0(day))
                .unwrap_or(start);
            let (category, transaction_type) = CATEGORIES[sequence.next(6) as usize];
            let cents = 100 + sequence.next(500_000);
            Transaction {
                id: format!("txn_{seed}_{index}"),
                date,
                description: format!("{category} {index}"),
                category: category.to_string(),
                amount: cents as f64 / 100.0,
                transaction_type,
                donor_name: None,
                donor_contact: None,
            }
        })
        .collect()
}

fn assert_summary_invariants(summary: &LedgerSummary, label: &str) {
    let net_gap = summary.total_income - summary.total_expenses - summary.net_income;
    assert!(net_gap.abs() < 1e-6, "{label}: net income drifted by {net_gap}");

    if summary.total_income + summary.total_expenses > 0.0 {
        let share_sum = summary
            .category_breakdown
            .iter()
            .map(|share| share.percentage)
            .sum::<f64>();
        assert!((share_sum - 100.0).abs() < 1e-6, "{label}: shares sum to {share_sum}");
    }

    assert!(summary.monthly_trends.len() <= 12, "{label}: too many trend buckets");
    assert!(
        summary
            .monthly_trends
            .windows(2)
            .all(|pair| pair[0].month < pair[1].month),
        "{label}: trend buckets are not strictly ascending"
    );
    for bucket in &summary.monthly_trends {
        assert!((bucket.income - bucket.expenses - bucket.net).abs() < 1e-6);
    }
    assert!(summary.top_categories.len() <= 10);
}

#[test]
fn synthetic_battery_holds_summary_invariants() {
    // (seed, rows, months spanned)
    let scenarios = [
        (1, 1, 1),
        (7, 40, 3),
        (11, 250, 12),
        (19, 400, 30),
        (23, 900, 60),
        (42, 5, 24),
    ];
    for (seed, rows, span) in scenarios {
        let ledger = generated_ledger(seed, rows, span);
        let summary = compute_summary(&ledger, None);
        let label = format!("seed {seed}, {rows} rows over {span} months");
        assert_eq!(summary.transaction_count, rows, "{label}");
        assert_summary_invariants(&summary, &label);
    }
}

#[test]
fn synthetic_battery_keeps_the_latest_twelve_months() {
    let ledger = generated_ledger(5, 600, 36);
    let latest = ledger.iter().map(|row| row.date).max();
    let summary = compute_summary(&ledger, None);

    assert_eq!(summary.monthly_trends.len(), 12);
    let last_bucket = summary.monthly_trends.last().map(|bucket| bucket.month.to_string());
    let latest_month = latest.map(|date| date.format("%Y-%m").to_string());
    assert_eq!(last_bucket, latest_month);
}

#[test]
fn empty_ledger_satisfies_the_same_invariants() {
    let summary = compute_summary(&[], None);
    assert_summary_invariants(&summary, "empty ledger");
    assert!(summary.category_breakdown.is_empty());
}
