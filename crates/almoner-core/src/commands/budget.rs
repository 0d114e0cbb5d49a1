use crate::analytics::compare_budget;
use crate::commands::common::{ensure_single_stdin, load_budgets, load_ledger};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::BudgetData;
use crate::ledger::{BudgetStore, LedgerStore, MonthKey};
use crate::{CoreError, CoreResult};

#[derive(Debug, Default)]
pub struct BudgetRunOptions {
    pub ledger: String,
    pub budgets: String,
    pub month: String,
    pub stdin_override: Option<String>,
}

pub fn run(ledger: &str, budgets: &str, month: &str) -> CoreResult<SuccessEnvelope> {
    run_with_options(BudgetRunOptions {
        ledger: ledger.to_string(),
        budgets: budgets.to_string(),
        month: month.to_string(),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: BudgetRunOptions) -> CoreResult<SuccessEnvelope> {
    let month = options
        .month
        .parse::<MonthKey>()
        .map_err(|message| CoreError::invalid_argument_for_command(&message, Some("budget")))?;
    ensure_single_stdin(
        "budget",
        [
            ("ledger", Some(options.ledger.as_str())),
            ("budgets", Some(options.budgets.as_str())),
        ],
    )?;

    let ledger = load_ledger(&options.ledger, options.stdin_override.clone())?;
    let budgets = load_budgets(&options.budgets, options.stdin_override)?;
    let report = compare_budget(&ledger.value.snapshot(), month, &budgets.value.get(month));

    success(
        "budget",
        BudgetData {
            ledger: ledger.source,
            budgets: budgets.source,
            report,
        },
    )
}
