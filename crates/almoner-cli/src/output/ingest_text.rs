use std::io;

use serde_json::Value;

use super::format::{self, Column, json_count, json_money, json_text};

const PREVIEW_ROWS: usize = 20;
const MAPPING_ORDER: [&str; 5] = ["date", "description", "amount", "category", "type"];

pub fn render_ingest(data: &Value) -> io::Result<String> {
    let accepted = data
        .get("accepted")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("ingest output requires accepted rows"))?;
    let source = json_text(data.get("source"), "-");
    let source_label = if data.get("source_kind").and_then(Value::as_str) == Some("stdin") {
        "stdin".to_string()
    } else {
        source.to_string()
    };

    let mut lines = vec![
        format!("Ingested CSV from {source_label}."),
        String::new(),
        "Column mapping:".to_string(),
    ];
    let mapping = data.get("mapping");
    let mapping_entries = MAPPING_ORDER
        .iter()
        .map(|field| {
            let header = mapping
                .and_then(|value| value.get(*field))
                .and_then(Value::as_str)
                .map_or_else(|| "(not mapped)".to_string(), |header| format!("\"{header}\""));
            (*field, header)
        })
        .collect::<Vec<(&str, String)>>();
    lines.extend(format::labelled(&mapping_entries));

    lines.push(String::new());
    lines.push("Rows:".to_string());
    lines.extend(format::figures(&[
        ("Read:", json_count(data.get("rows_read"))),
        ("Accepted:", json_count(data.get("accepted_count"))),
        ("Failed:", json_count(data.get("failed_count"))),
    ]));

    if !accepted.is_empty() {
        lines.push(String::new());
        if accepted.len() > PREVIEW_ROWS {
            lines.push(format!(
                "Accepted rows (first {PREVIEW_ROWS} of {}):",
                accepted.len()
            ));
        } else {
            lines.push("Accepted rows:".to_string());
        }
        let rows = accepted
            .iter()
            .take(PREVIEW_ROWS)
            .map(|row| {
                vec![
                    json_text(row.get("date"), "unknown").to_string(),
                    json_text(row.get("description"), "").to_string(),
                    json_text(row.get("category"), "").to_string(),
                    json_text(row.get("type"), "").to_string(),
                    json_money(row.get("amount")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::table(
            &[
                Column::figure("Date"),
                Column::label("Description"),
                Column::label("Category"),
                Column::label("Type"),
                Column::figure("Amount"),
            ],
            &rows,
        ));
    }

    lines.push(String::new());
    match data.get("appended") {
        Some(appended) => {
            let count = appended
                .get("appended")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            lines.push(format!(
                "Appended {count} transaction(s) to {}; the ledger now holds {}.",
                json_text(appended.get("ledger"), "the ledger"),
                json_count(appended.get("ledger_size")),
            ));
            let rejected = json_count(appended.get("rejected"));
            if rejected != "0" {
                lines.push(format!("{rejected} row(s) were rejected by the ledger."));
            }
        }
        None => {
            lines.push("Nothing was saved. Rerun with `--append-to <ledger.json>` to keep these rows.".to_string());
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_ingest;

    fn base() -> serde_json::Value {
        json!({
            "source_kind": "file",
            "source": "giving.csv",
            "headers": ["Date", "Description", "Amount"],
            "mapping": {"date": "Date", "description": "Description", "amount": "Amount"},
            "rows_read": 2,
            "accepted_count": 1,
            "failed_count": 1,
            "accepted": [
                {"date": "2024-01-05", "description": "Sunday Offering", "category": "Other", "amount": 100.0, "type": "income"}
            ]
        })
    }

    #[test]
    fn renders_mapping_counts_and_preview() {
        let rendered = render_ingest(&base());
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Ingested CSV from giving.csv."));
            assert!(text.contains("amount       \"Amount\""));
            assert!(text.contains("category     (not mapped)"));
            assert!(text.contains("Failed:    1"));
            assert!(text.contains("Sunday Offering"));
            assert!(text.contains("Nothing was saved."));
        }
    }

    #[test]
    fn reports_appended_rows() {
        let mut data = base();
        data["appended"] = json!({
            "ledger": "ledger.json",
            "appended": [{"id": "txn_1"}],
            "rejected": 0,
            "ledger_size": 7
        });
        let rendered = render_ingest(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Appended 1 transaction(s) to ledger.json; the ledger now holds 7."));
            assert!(!text.contains("rejected by the ledger"));
        }
    }
}
