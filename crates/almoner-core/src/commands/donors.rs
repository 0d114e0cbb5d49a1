use crate::CoreResult;
use crate::analytics::DonorProfileBuilder;
use crate::analytics::date::parse_iso_date_strict;
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::commands::common::{ensure_single_stdin, load_ledger, load_members};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::DonorsData;
use crate::ledger::LedgerStore;

#[derive(Debug, Default)]
pub struct DonorsRunOptions {
    pub ledger: String,
    pub members: Option<String>,
    /// Overrides the system date used for active and new donor windows.
    pub today: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn run(ledger: &str, members: Option<&str>, today: Option<&str>) -> CoreResult<SuccessEnvelope> {
    run_with_options(DonorsRunOptions {
        ledger: ledger.to_string(),
        members: members.map(std::string::ToString::to_string),
        today: today.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: DonorsRunOptions) -> CoreResult<SuccessEnvelope> {
    let clock: Box<dyn Clock> = match options.today.as_deref() {
        Some(value) => Box::new(FixedClock(parse_iso_date_strict(value, "today", "donors")?)),
        None => Box::new(SystemClock),
    };

    ensure_single_stdin(
        "donors",
        [
            ("ledger", Some(options.ledger.as_str())),
            ("members", options.members.as_deref()),
        ],
    )?;

    let ledger = load_ledger(&options.ledger, options.stdin_override.clone())?;
    let members = match options.members.as_deref() {
        Some(path) => Some(load_members(path, options.stdin_override)?),
        None => None,
    };

    let mut builder = DonorProfileBuilder::new(&*clock);
    if let Some(directory) = &members {
        builder = builder.with_members(&directory.value);
    }
    let report = builder.build(&ledger.value.snapshot());

    success(
        "donors",
        DonorsData {
            ledger: ledger.source,
            members: members.map(|directory| directory.source),
            report,
        },
    )
}
