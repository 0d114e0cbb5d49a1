use std::path::Path;

use crate::CoreResult;
use crate::commands::common::{load_ledger_or_empty, write_ledger};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{IngestAppendSummary, IngestData};
use crate::ingest::ingest_text;
use crate::ingest::mapping::{CanonicalField, parse_override};
use crate::input::resolve_source;
use crate::ledger::LedgerStore;
use crate::settings::load_settings;

#[derive(Debug, Default)]
pub struct IngestRunOptions<'a> {
    pub path: String,
    /// `field=Header` pairs that replace the auto-mapped header for a field.
    pub mappings: Vec<String>,
    /// Ledger snapshot file that accepted rows are appended to.
    pub append_to: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: &str, mappings: Vec<String>, append_to: Option<String>) -> CoreResult<SuccessEnvelope> {
    run_with_options(IngestRunOptions {
        path: path.to_string(),
        mappings,
        append_to,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: IngestRunOptions<'_>) -> CoreResult<SuccessEnvelope> {
    let overrides = options
        .mappings
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<CoreResult<Vec<(CanonicalField, String)>>>()?;
    let settings = load_settings(options.home_override)?;
    let target = options.append_to.as_deref().map(load_ledger_or_empty).transpose()?;
    let source = resolve_source(&options.path, options.stdin_override)?;
    let report = ingest_text(&source.content, &overrides, &settings.catalog())?;

    let appended = match target {
        Some(mut ledger) => {
            let ledger_path = ledger.source.clone();
            let outcome = ledger.value.append_batch(report.outcome.accepted.clone());
            let snapshot = ledger.value.snapshot();
            write_ledger(&ledger_path, &snapshot)?;
            Some(IngestAppendSummary {
                ledger: ledger_path,
                appended: outcome.appended,
                rejected: outcome.rejected,
                ledger_size: snapshot.len(),
            })
        }
        None => None,
    };

    let data = IngestData {
        source_kind: source.source_kind.as_str().to_string(),
        source: source.source_ref,
        accepted_count: report.outcome.accepted.len(),
        failed_count: report.outcome.failed_count,
        rows_read: report.row_count,
        headers: report.headers,
        mapping: report.mapping,
        accepted: report.outcome.accepted,
        appended,
    };

    success("ingest", data)
}
