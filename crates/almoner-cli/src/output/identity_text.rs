use std::io;

use serde_json::Value;

use super::format::{self, Column, json_text};

pub fn render_duplicates(data: &Value) -> io::Result<String> {
    let groups = data
        .get("groups")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("identity duplicates output requires groups"))?;
    let member_count = data.get("member_count").and_then(Value::as_u64).unwrap_or(0);

    if groups.is_empty() {
        return Ok(format!(
            "No shared email addresses among {member_count} member(s)."
        ));
    }

    let mut lines = vec![
        format!(
            "{} email address(es) are shared among {member_count} member(s).",
            groups.len()
        ),
        String::new(),
        "Shared addresses:".to_string(),
    ];
    let rows = groups
        .iter()
        .map(|group| {
            let ids = group
                .get("member_ids")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<&str>>()
                        .join(", ")
                })
                .unwrap_or_default();
            vec![json_text(group.get("email"), "").to_string(), ids]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[Column::label("Email"), Column::label("Members")],
        &rows,
    ));
    lines.push(String::new());
    lines.push("These are candidates only; confirm before merging any records.".to_string());

    Ok(lines.join("\n"))
}

pub fn render_check(data: &Value) -> io::Result<String> {
    let taken = data
        .get("taken")
        .and_then(Value::as_bool)
        .ok_or_else(|| io::Error::other("identity check output requires taken"))?;
    let email = json_text(data.get("email"), "");

    let Some(normalized) = data.get("normalized_email").and_then(Value::as_str) else {
        return Ok("The email is blank, so it cannot collide with any member.".to_string());
    };

    if taken {
        let matched = json_text(data.get("matched_member_id"), "another member");
        return Ok(format!(
            "`{email}` is already used by member {matched} (compared as `{normalized}`)."
        ));
    }

    let mut line = format!("`{email}` is available (compared as `{normalized}`).");
    if let Some(excluded) = data.get("exclude_id").and_then(Value::as_str) {
        line.push_str(&format!(" Member {excluded} was not considered."));
    }
    Ok(line)
}

pub fn render_suggest(data: &Value) -> io::Result<String> {
    let suggestions = data
        .get("suggestions")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("identity suggest output requires suggestions"))?;

    if suggestions.is_empty() {
        return Ok("No member looks like a match.".to_string());
    }

    let mut lines = vec![
        format!("{} possible match(es):", suggestions.len()),
        String::new(),
    ];
    let rows = suggestions
        .iter()
        .map(|suggestion| {
            vec![
                json_text(suggestion.get("member_id"), "").to_string(),
                json_text(suggestion.get("member_name"), "").to_string(),
                json_text(suggestion.get("member_email"), "-").to_string(),
                json_text(suggestion.get("reason"), "").replace('_', " "),
                format!(
                    "{:.2}",
                    suggestion.get("score").and_then(Value::as_f64).unwrap_or(0.0)
                ),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[Column::label("Member"), Column::label("Name"), Column::label("Email"), Column::label("Reason"), Column::figure("Score")],
        &rows,
    ));

    Ok(lines.join("\n"))
}
