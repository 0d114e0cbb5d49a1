mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use almoner_core::CoreError;
use almoner_core::settings::{DEFAULT_LOG_LEVEL, load_settings};
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "ALMONER_LOG";

const ROOT_HELP: &str = "Almoner - ledger analytics and ingestion

Usage:
  almoner <command>

Start here:
  almoner ingest --help
  almoner summary <ledger.json>
";

const TOP_LEVEL_HELP: &str = "Almoner - ledger analytics and ingestion

USAGE: almoner <command>

Bring transactions in:
  1. almoner ingest --help                                  Read the CSV mapping rules
  2. almoner ingest <file.csv>                              Preview mapped rows and failures
  3. almoner ingest <file.csv> --append-to ledger.json      Save accepted rows to a ledger

Analyze a ledger snapshot:
  almoner summary ledger.json [--from D] [--to D]           Totals, monthly trends, categories
  almoner budget ledger.json --budgets b.json --month M     Budget vs actual for one month
  almoner donors ledger.json [--members m.json]             Donor profiles and retention

Check member records:
  almoner identity duplicates members.json                  Members sharing an email
  almoner identity check members.json <email>               Is this email already used?
  almoner identity suggest members.json --name <name>       Likely member matches

Every command accepts `--json`, and `-` reads a snapshot from stdin.
Set ALMONER_LOG=debug to see what the engines are doing.
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

/// `ALMONER_LOG` wins; otherwise the settings file's `log_level`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        let level = load_settings(None)
            .map(|settings| settings.log_level)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                CoreError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines; recovery
/// steps carry the guidance instead.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Subcommand path for help hints, e.g. "identity check".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match non_flags.as_slice() {
        ["identity", "duplicates", ..] => Some("identity duplicates"),
        ["identity", "check", ..] => Some("identity check"),
        ["identity", "suggest", ..] => Some("identity suggest"),
        ["identity", ..] => Some("identity"),
        ["summary", ..] => Some("summary"),
        ["budget", ..] => Some("budget"),
        ["donors", ..] => Some("donors"),
        ["ingest", ..] => Some("ingest"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn exit_code_for_error(error: &CoreError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &CoreError) -> bool {
    error.code.starts_with("internal_") || error.code == "ledger_write_failed"
}

#[cfg(test)]
mod tests {
    use almoner_core::CoreError;

    use super::{command_path_from_args, is_internal_error, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_path_skips_flags_and_positional_paths() {
        assert_eq!(
            command_path_from_args(&args(&["almoner", "identity", "check", "m.json", "--json"])),
            Some("identity check".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["almoner", "--json", "budget", "l.json"])),
            Some("budget".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["almoner", "--json"])), None);
        assert_eq!(command_path_from_args(&args(&["almoner", "import"])), None);
    }

    #[test]
    fn clap_boilerplate_is_removed() {
        let raw = "error: unexpected argument '--bogus' found\n\nUsage: almoner summary <LEDGER>\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(raw),
            "error: unexpected argument '--bogus' found"
        );
    }

    #[test]
    fn internal_codes_are_separated_from_user_errors() {
        assert!(is_internal_error(&CoreError::internal_serialization("boom")));
        assert!(is_internal_error(&CoreError::ledger_write_failed("l.json", "denied")));
        assert!(!is_internal_error(&CoreError::invalid_argument_for_command("bad", None)));
        assert!(!is_internal_error(&CoreError::ingest_too_few_lines(1)));
    }
}
