use std::io;

use serde_json::Value;

use super::format::{self, Column, json_count, json_money, json_text};

pub fn render_donors(data: &Value) -> io::Result<String> {
    let profiles = data
        .get("profiles")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("donors output requires profiles"))?;
    let analytics = data
        .get("analytics")
        .ok_or_else(|| io::Error::other("donors output requires analytics"))?;
    let as_of = json_text(data.get("as_of"), "today");

    if profiles.is_empty() {
        return Ok([
            format!("No donors as of {as_of}."),
            String::new(),
            "The ledger has no income transactions yet.".to_string(),
        ]
        .join("\n"));
    }

    let mut lines = vec![
        format!("{} donor(s) as of {as_of}.", profiles.len()),
        String::new(),
        "Donors (largest total first):".to_string(),
    ];

    let rows = profiles
        .iter()
        .map(|profile| {
            let identity = profile.get("identity");
            vec![
                json_text(identity.and_then(|value| value.get("display_name")), "unknown")
                    .to_string(),
                json_money(profile.get("total_given")),
                json_count(profile.get("transaction_count")),
                json_money(profile.get("monthly_average")),
                json_text(profile.get("last_gift_date"), "unknown").to_string(),
                if profile.get("is_regular").and_then(Value::as_bool) == Some(true) {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
                json_text(identity.and_then(|value| value.get("member_id")), "-").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::table(
        &[
            Column::label("Donor"),
            Column::figure("Given"),
            Column::figure("Gifts"),
            Column::figure("Monthly avg"),
            Column::figure("Last gift"),
            Column::label("Regular"),
            Column::label("Member"),
        ],
        &rows,
    ));

    lines.push(String::new());
    lines.push("Giving overview:".to_string());
    let retention = analytics.get("donor_retention");
    lines.extend(format::labelled(&[
        ("Total donors:", json_count(analytics.get("total_donors"))),
        ("Active (6 months):", json_count(analytics.get("active_donors"))),
        ("New this month:", json_count(analytics.get("new_donors_this_month"))),
        ("Total giving:", json_money(analytics.get("total_giving"))),
        ("Average per donor:", json_money(analytics.get("average_gift_size"))),
        (
            "Retention:",
            format!(
                "{} retained, {} lapsed, {} new",
                json_count(retention.and_then(|value| value.get("retained"))),
                json_count(retention.and_then(|value| value.get("lapsed"))),
                json_count(retention.and_then(|value| value.get("new"))),
            ),
        ),
    ]));

    let trends = analytics
        .get("giving_trends")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !trends.is_empty() {
        lines.push(String::new());
        lines.push("Giving by month:".to_string());
        let trend_rows = trends
            .iter()
            .map(|trend| {
                vec![
                    json_text(trend.get("month"), "unknown").to_string(),
                    json_money(trend.get("amount")),
                    json_count(trend.get("donor_count")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::table(
            &[
                Column::figure("Month"),
                Column::figure("Amount"),
                Column::figure("Donors"),
            ],
            &trend_rows,
        ));
    }

    Ok(lines.join("\n"))
}
