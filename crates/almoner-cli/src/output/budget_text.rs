use std::io;

use serde_json::Value;

use super::format::{self, Column, json_money, json_percent, json_text};

pub fn render_budget(data: &Value) -> io::Result<String> {
    let lines_data = data
        .get("lines")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("budget output requires lines"))?;
    let month = json_text(data.get("month"), "unknown");

    if lines_data.is_empty() {
        return Ok([
            format!("No budget activity for {month}."),
            String::new(),
            "Nothing was allocated and no expenses were recorded in this month.".to_string(),
        ]
        .join("\n"));
    }

    let mut lines = vec![
        format!("Budget variance for {month}."),
        String::new(),
        "Categories (largest variance first):".to_string(),
    ];

    let rows = lines_data
        .iter()
        .map(|line| {
            vec![
                json_text(line.get("category"), "unknown").to_string(),
                json_money(line.get("budgeted")),
                json_money(line.get("actual")),
                json_money(line.get("variance")),
                json_percent(line.get("variance_percentage")),
                status(line).to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[
            Column::label("Category"),
            Column::figure("Budgeted"),
            Column::figure("Actual"),
            Column::figure("Variance"),
            Column::figure("Var %"),
            Column::label("Status"),
        ],
        &rows,
    ));

    lines.push(String::new());
    lines.push("Totals:".to_string());
    lines.extend(format::figures(&[
        ("Budgeted:", json_money(data.get("total_budgeted"))),
        ("Actual:", json_money(data.get("total_actual"))),
        ("Variance:", json_money(data.get("total_variance"))),
    ]));

    Ok(lines.join("\n"))
}

fn status(line: &Value) -> &'static str {
    let budgeted = line.get("budgeted").and_then(Value::as_f64).unwrap_or(0.0);
    let variance = line.get("variance").and_then(Value::as_f64).unwrap_or(0.0);
    if budgeted == 0.0 {
        "unbudgeted"
    } else if variance < 0.0 {
        "over"
    } else {
        "within"
    }
}
