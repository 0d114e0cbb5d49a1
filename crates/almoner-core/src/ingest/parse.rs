use serde::Serialize;

use crate::{CoreError, CoreResult};

/// Header row plus data rows, every cell trimmed. Rows keep whatever width
/// the source line had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Splits CSV text on line breaks and commas. Quotes carry no meaning and
/// blank lines are dropped before counting.
pub fn parse(raw: &str) -> CoreResult<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| {
            CoreError::invalid_argument_with_recovery(
                &format!("CSV text could not be split into records: {error}"),
                vec!["Check that the input is UTF-8 text.".to_string()],
            )
        })?;
        if is_blank(&record) {
            continue;
        }
        lines.push(
            record
                .iter()
                .map(str::to_string)
                .collect::<Vec<String>>(),
        );
    }

    if lines.len() < 2 {
        return Err(CoreError::ingest_too_few_lines(lines.len()));
    }

    let rows = lines.split_off(1);
    let headers = lines.into_iter().next().unwrap_or_default();
    Ok(ParsedCsv { headers, rows })
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty) && record.len() <= 1
}
