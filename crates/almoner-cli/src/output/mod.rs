mod budget_text;
mod donors_text;
mod error_text;
mod format;
mod identity_text;
mod ingest_text;
mod json;
mod mode;
mod summary_text;

use std::io;

use almoner_core::{CoreError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

use crate::stdout_io::write_stdout_line;

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &CoreError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "summary" => summary_text::render_summary(&success.data),
        "budget" => budget_text::render_budget(&success.data),
        "donors" => donors_text::render_donors(&success.data),
        "ingest" => ingest_text::render_ingest(&success.data),
        "identity duplicates" => identity_text::render_duplicates(&success.data),
        "identity check" => identity_text::render_check(&success.data),
        "identity suggest" => identity_text::render_suggest(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
