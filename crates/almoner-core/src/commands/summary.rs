use crate::CoreResult;
use crate::analytics::compute_summary;
use crate::analytics::date::build_range;
use crate::commands::common::load_ledger;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SummaryData;
use crate::ledger::LedgerStore;

#[derive(Debug, Default)]
pub struct SummaryRunOptions {
    pub ledger: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn run(ledger: &str, from: Option<&str>, to: Option<&str>) -> CoreResult<SuccessEnvelope> {
    run_with_options(SummaryRunOptions {
        ledger: ledger.to_string(),
        from: from.map(std::string::ToString::to_string),
        to: to.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: SummaryRunOptions) -> CoreResult<SuccessEnvelope> {
    let range = build_range(options.from.as_deref(), options.to.as_deref(), "summary")?;
    let ledger = load_ledger(&options.ledger, options.stdin_override)?;
    let summary = compute_summary(&ledger.value.snapshot(), range);

    let data = SummaryData {
        ledger: ledger.source,
        from: range.map(|window| window.start).filter(|_| options.from.is_some()),
        to: range.map(|window| window.end).filter(|_| options.to.is_some()),
        summary,
    };

    success("summary", data)
}
