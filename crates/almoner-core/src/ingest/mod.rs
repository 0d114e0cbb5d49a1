pub mod mapping;
pub mod parse;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::CoreResult;
use crate::ingest::mapping::{CanonicalField, ColumnMapping};
use crate::ingest::validate::IngestOutcome;

pub use mapping::auto_map;
pub use parse::parse;
pub use validate::ingest;

/// Category names an ingested row may be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            income: to_strings(&[
                "Tithes",
                "Offerings",
                "Donations",
                "Building Fund",
                "Missions",
                "Special Events",
                "Other Income",
            ]),
            expense: to_strings(&[
                "Salaries",
                "Utilities",
                "Rent",
                "Maintenance",
                "Supplies",
                "Outreach",
                "Benevolence",
                "Other Expenses",
            ]),
        }
    }
}

impl CategoryCatalog {
    /// Catalog spelling of `raw`, matched case-insensitively across both lists.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let wanted = raw.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.income
            .iter()
            .chain(self.expense.iter())
            .find(|name| name.to_lowercase() == wanted)
            .map(String::as_str)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    pub row_count: usize,
    #[serde(flatten)]
    pub outcome: IngestOutcome,
}

/// Parse, auto-map, apply explicit overrides, then ingest.
pub fn ingest_text(
    raw: &str,
    overrides: &[(CanonicalField, String)],
    catalog: &CategoryCatalog,
) -> CoreResult<IngestReport> {
    let parsed = parse(raw)?;

    let mut mapping = auto_map(&parsed.headers);
    for (field, header) in overrides {
        mapping.set(*field, header);
    }
    tracing::debug!(
        headers = ?parsed.headers,
        mapping = ?mapping,
        "resolved ingest column mapping"
    );

    let outcome = ingest(&parsed, &mapping, catalog)?;
    if outcome.failed_count > 0 {
        tracing::warn!(
            accepted = outcome.accepted.len(),
            failed = outcome.failed_count,
            "ingest dropped rows that could not be coerced"
        );
    } else {
        tracing::info!(accepted = outcome.accepted.len(), "ingest accepted every row");
    }

    Ok(IngestReport {
        row_count: parsed.rows.len(),
        headers: parsed.headers,
        mapping,
        outcome,
    })
}
