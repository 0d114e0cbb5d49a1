use chrono::NaiveDate;
use serde::Serialize;

use crate::ingest::CategoryCatalog;
use crate::ingest::mapping::{CanonicalField, ColumnMapping};
use crate::ingest::parse::ParsedCsv;
use crate::ledger::{NewTransaction, TransactionType};
use crate::{CoreError, CoreResult};

/// Accepted rows in input order plus how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub accepted: Vec<NewTransaction>,
    pub failed_count: usize,
}

pub const FALLBACK_CATEGORY: &str = "Other";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

struct ColumnIndexes {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
    transaction_type: Option<usize>,
}

/// Turns parsed rows into new transactions. Structural problems with the
/// mapping abort before any row is looked at; a bad row only bumps
/// `failed_count`.
pub fn ingest(
    parsed: &ParsedCsv,
    mapping: &ColumnMapping,
    catalog: &CategoryCatalog,
) -> CoreResult<IngestOutcome> {
    let columns = resolve_columns(parsed, mapping)?;

    let mut outcome = IngestOutcome::default();
    for row in &parsed.rows {
        match coerce_row(row, &columns, catalog) {
            Some(transaction) => outcome.accepted.push(transaction),
            None => outcome.failed_count += 1,
        }
    }
    Ok(outcome)
}

fn resolve_columns(parsed: &ParsedCsv, mapping: &ColumnMapping) -> CoreResult<ColumnIndexes> {
    let missing = mapping.missing_required();
    if !missing.is_empty() {
        return Err(CoreError::ingest_required_column_unmapped(
            missing
                .iter()
                .map(|field| field.as_str().to_string())
                .collect(),
            parsed.headers.clone(),
        ));
    }

    let index_of = |field: CanonicalField| -> CoreResult<Option<usize>> {
        let Some(header) = mapping.get(field) else {
            return Ok(None);
        };
        match parsed.headers.iter().position(|value| value == header) {
            Some(index) => Ok(Some(index)),
            None => Err(CoreError::ingest_mapped_column_missing(
                field.as_str(),
                header,
                parsed.headers.clone(),
            )),
        }
    };

    Ok(ColumnIndexes {
        date: index_of(CanonicalField::Date)?.unwrap_or_default(),
        description: index_of(CanonicalField::Description)?.unwrap_or_default(),
        amount: index_of(CanonicalField::Amount)?.unwrap_or_default(),
        category: index_of(CanonicalField::Category)?,
        transaction_type: index_of(CanonicalField::Type)?,
    })
}

fn coerce_row(
    row: &[String],
    columns: &ColumnIndexes,
    catalog: &CategoryCatalog,
) -> Option<NewTransaction> {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or_default();

    let date = parse_flexible_date(cell(columns.date))?;
    let description = cell(columns.description);
    if description.is_empty() {
        return None;
    }
    let signed_amount = parse_amount(cell(columns.amount))?;
    let transaction_type = columns
        .transaction_type
        .and_then(|index| type_from_cell(cell(index)))
        .unwrap_or(if signed_amount < 0.0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        });
    let category = columns
        .category
        .and_then(|index| catalog.resolve(cell(index)))
        .unwrap_or(FALLBACK_CATEGORY)
        .to_string();

    Some(NewTransaction {
        date,
        description: description.to_string(),
        category,
        amount: signed_amount.abs(),
        transaction_type,
        donor_name: None,
        donor_contact: None,
    })
}

pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Keeps digits, `.` and `-`, then parses. Zero is rejected because the
/// ledger only stores positive amounts.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw
        .chars()
        .filter(|character| character.is_ascii_digit() || *character == '.' || *character == '-')
        .collect::<String>();
    let amount = cleaned.parse::<f64>().ok()?;
    if !amount.is_finite() || amount == 0.0 {
        return None;
    }
    Some(amount)
}

fn type_from_cell(raw: &str) -> Option<TransactionType> {
    let lowered = raw.to_lowercase();
    if lowered.contains("income") || lowered.contains("credit") {
        return Some(TransactionType::Income);
    }
    if lowered.contains("expense") || lowered.contains("debit") {
        return Some(TransactionType::Expense);
    }
    None
}
