use std::io;

use serde_json::Value;

use super::format::{self, Column, json_count, json_money, json_percent, json_text};

pub fn render_summary(data: &Value) -> io::Result<String> {
    let trends = data
        .get("monthly_trends")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("summary output requires monthly_trends"))?;
    let top = data
        .get("top_categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("summary output requires top_categories"))?;

    let mut lines = vec![heading(data), String::new(), "Totals:".to_string()];
    lines.extend(format::figures(&[
        ("Income:", json_money(data.get("total_income"))),
        ("Expenses:", json_money(data.get("total_expenses"))),
        ("Net:", json_money(data.get("net_income"))),
        ("Transactions:", json_count(data.get("transaction_count"))),
        ("Average:", json_money(data.get("average_transaction"))),
    ]));

    if json_count(data.get("transaction_count")) == "0" {
        lines.push(String::new());
        lines.push("No transactions fall in this range.".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.push("Monthly trends:".to_string());
    let trend_rows = trends
        .iter()
        .map(|bucket| {
            vec![
                json_text(bucket.get("month"), "unknown").to_string(),
                json_money(bucket.get("income")),
                json_money(bucket.get("expenses")),
                json_money(bucket.get("net")),
                json_count(bucket.get("transaction_count")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[
            Column::figure("Month"),
            Column::figure("Income"),
            Column::figure("Expenses"),
            Column::figure("Net"),
            Column::figure("Count"),
        ],
        &trend_rows,
    ));

    if let Some(growth) = data.get("growth_rate")
        && trends.len() >= 2
    {
        lines.push(String::new());
        lines.push("Growth vs previous month:".to_string());
        lines.extend(format::figures(&[
            ("Income:", json_percent(growth.get("income"))),
            ("Expenses:", json_percent(growth.get("expenses"))),
            ("Net:", json_percent(growth.get("net"))),
        ]));
    }

    lines.push(String::new());
    lines.push("Top categories:".to_string());
    let category_rows = top
        .iter()
        .map(|share| {
            vec![
                json_text(share.get("category"), "unknown").to_string(),
                json_text(share.get("type"), "unknown").to_string(),
                json_money(share.get("amount")),
                json_percent(share.get("percentage")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[
            Column::label("Category"),
            Column::label("Type"),
            Column::figure("Amount"),
            Column::figure("Share"),
        ],
        &category_rows,
    ));

    Ok(lines.join("\n"))
}

fn heading(data: &Value) -> String {
    let from = data.get("from").and_then(Value::as_str);
    let to = data.get("to").and_then(Value::as_str);
    match (from, to) {
        (Some(start), Some(end)) => format!("Ledger summary from {start} to {end}."),
        (Some(start), None) => format!("Ledger summary from {start} onward."),
        (None, Some(end)) => format!("Ledger summary through {end}."),
        (None, None) => "Ledger summary.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_summary;

    #[test]
    fn renders_totals_trends_and_categories() {
        let data = json!({
            "ledger": "ledger.json",
            "from": "2024-02-01",
            "to": null,
            "total_income": 550.0,
            "total_expenses": 300.0,
            "net_income": 250.0,
            "transaction_count": 6,
            "average_transaction": 41.666,
            "monthly_trends": [
                {"month": "2024-02", "income": 200.0, "expenses": 150.0, "net": 50.0, "transaction_count": 2},
                {"month": "2024-03", "income": 350.0, "expenses": 150.0, "net": 200.0, "transaction_count": 4}
            ],
            "category_breakdown": [],
            "top_categories": [
                {"category": "Tithes", "type": "income", "amount": 300.0, "percentage": 35.29}
            ],
            "growth_rate": {"income": 75.0, "expenses": 0.0, "net": 300.0}
        });

        let rendered = render_summary(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Ledger summary from 2024-02-01 onward."));
            assert!(text.contains("Income:        550.00"));
            assert!(text.contains("Average:        41.67"));
            assert!(text.contains("Transactions:       6"));
            assert!(text.contains("2024-03"));
            assert!(text.contains("Growth vs previous month:"));
            assert!(text.contains("300.0%"));
            assert!(text.contains("Tithes"));
            assert!(text.contains("35.3%"));
        }
    }

    #[test]
    fn empty_summary_stops_after_totals() {
        let data = json!({
            "total_income": 0.0,
            "total_expenses": 0.0,
            "net_income": 0.0,
            "transaction_count": 0,
            "average_transaction": 0.0,
            "monthly_trends": [],
            "top_categories": [],
            "growth_rate": {"income": 0.0, "expenses": 0.0, "net": 0.0}
        });

        let rendered = render_summary(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Ledger summary."));
            assert!(text.contains("No transactions fall in this range."));
            assert!(!text.contains("Monthly trends:"));
        }
    }

    #[test]
    fn missing_trends_is_an_error() {
        assert!(render_summary(&json!({"top_categories": []})).is_err());
    }
}
