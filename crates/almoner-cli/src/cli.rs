use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_month(value: &str) -> Result<String, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 7
        && bytes[4] == b'-'
        && [0usize, 1, 2, 3, 5, 6]
            .iter()
            .all(|index| bytes[*index].is_ascii_digit());
    if !shaped {
        return Err("month must use YYYY-MM format".to_string());
    }
    if !matches!(value[5..].parse::<u32>(), Ok(1..=12)) {
        return Err("month must be between 01 and 12".to_string());
    }
    Ok(value.to_string())
}

/// Extended help shown after `almoner ingest --help`.
pub const INGEST_AFTER_HELP: &str = "\
How ingestion works:
  <path> is a local CSV file. Use `-` to read stdin.
  Example: cat giving.csv | almoner ingest -

  The first non-blank line is the header row. Fields are split on commas;
  quoted fields and multi-line cells are not supported.

Column auto-mapping (first header containing a keyword wins):
  date         date
  description  desc, details, memo
  amount       amount, value, total
  category     category, group          (optional)
  type         type                     (optional)

  date, description and amount must be mapped or nothing is processed.
  Override any field with `--map field=Header`, repeatable:
    almoner ingest giving.csv --map amount=\"Gift (USD)\" --map date=When

Row rules:
  date         YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY, MM-DD-YYYY, or month names
               such as `Jan 5 2024` and `5 January 2024`.
  amount       currency symbols and separators are ignored; zero fails the row.
  type         cells mentioning income/credit or expense/debit; otherwise a
               negative amount is an expense and a positive one is income.
  category     matched case-insensitively against the configured catalog,
               else `Other`.
  Rows that fail any rule are counted, not reported one by one.

Saving rows:
  `--append-to ledger.json` appends accepted rows to a ledger snapshot,
  creating the file when it does not exist yet.
";

#[derive(Debug, Parser)]
#[command(
    name = "almoner",
    version,
    about = "ledger analytics and ingestion for congregations",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize income, expenses, monthly trends and categories
    Summary {
        /// Ledger snapshot (JSON array of transactions, `-` for stdin)
        ledger: String,
        /// Start date filter (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// End date filter (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Compare one month's budget allocations against actual expenses
    Budget {
        /// Ledger snapshot (JSON array of transactions, `-` for stdin)
        ledger: String,
        /// Budgets snapshot (JSON object of month -> category -> amount)
        #[arg(long)]
        budgets: String,
        /// Month to compare (YYYY-MM)
        #[arg(long, value_parser = parse_month)]
        month: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Build donor profiles and giving analytics
    Donors {
        /// Ledger snapshot (JSON array of transactions, `-` for stdin)
        ledger: String,
        /// Member directory used to link donors by contact email
        #[arg(long)]
        members: Option<String>,
        /// Date treated as today for active and new donor windows (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Turn CSV text into transactions with automatic column mapping
    #[command(after_long_help = INGEST_AFTER_HELP)]
    Ingest {
        /// Path to a CSV file (use `-` for stdin)
        path: String,
        /// Map a field to a source header, e.g. `amount=Gift` (repeatable)
        #[arg(long = "map", value_name = "FIELD=HEADER")]
        mappings: Vec<String>,
        /// Append accepted rows to this ledger snapshot file
        #[arg(long, value_name = "LEDGER")]
        append_to: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Advisory email-based matching against a member directory
    #[command(arg_required_else_help = true)]
    Identity {
        #[command(subcommand)]
        command: IdentityCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum IdentityCommand {
    /// List members that share a normalized email address
    Duplicates {
        /// Member directory (JSON array of members, `-` for stdin)
        members: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Check whether an email is already used by another member
    Check {
        /// Member directory (JSON array of members, `-` for stdin)
        members: String,
        /// Email address to check
        email: String,
        /// Member id to ignore, usually the member being edited
        #[arg(long = "exclude", value_name = "MEMBER_ID")]
        exclude_id: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Suggest members that may match an email or a name
    Suggest {
        /// Member directory (JSON array of members, `-` for stdin)
        members: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, IdentityCommand, parse_from, parse_month};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 14] = [
            vec!["almoner", "summary", "ledger.json"],
            vec!["almoner", "summary", "-", "--json"],
            vec![
                "almoner",
                "summary",
                "ledger.json",
                "--from",
                "2024-01-01",
                "--to",
                "2024-06-30",
            ],
            vec![
                "almoner",
                "budget",
                "ledger.json",
                "--budgets",
                "budgets.json",
                "--month",
                "2024-03",
            ],
            vec!["almoner", "donors", "ledger.json"],
            vec![
                "almoner",
                "donors",
                "ledger.json",
                "--members",
                "members.json",
                "--today",
                "2024-03-25",
                "--json",
            ],
            vec!["almoner", "ingest", "giving.csv"],
            vec!["almoner", "ingest", "-", "--json"],
            vec!["almoner", "ingest", "giving.csv", "--map", "amount=Gift"],
            vec!["almoner", "ingest", "giving.csv", "--append-to", "ledger.json"],
            vec!["almoner", "identity", "duplicates", "members.json"],
            vec!["almoner", "identity", "check", "members.json", "a@b.org"],
            vec![
                "almoner",
                "identity",
                "check",
                "members.json",
                "a@b.org",
                "--exclude",
                "m1",
            ],
            vec!["almoner", "identity", "suggest", "members.json", "--name", "Ann"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn ingest_collects_repeated_mappings() {
        let parsed = parse_from([
            "almoner",
            "ingest",
            "giving.csv",
            "--map",
            "amount=Gift",
            "--map",
            "date=When",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Ingest { ref mappings, .. } if mappings.len() == 2
            ));
        }
    }

    #[test]
    fn parse_identity_subcommands() {
        let parsed = parse_from([
            "almoner",
            "identity",
            "suggest",
            "members.json",
            "--email",
            "ann@example.org",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Identity {
                    command: IdentityCommand::Suggest { json: true, .. }
                }
            ));
        }
    }

    #[test]
    fn bare_identity_shows_help() {
        let parsed = parse_from(["almoner", "identity"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(
                err.kind(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            );
        }
    }

    #[test]
    fn budget_requires_budgets_and_month() {
        let parsed = parse_from(["almoner", "budget", "ledger.json", "--month", "2024-03"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn invalid_dates_and_months_are_rejected() {
        assert!(parse_from(["almoner", "summary", "l.json", "--from", "2024-99-01"]).is_err());
        assert!(parse_from(["almoner", "donors", "l.json", "--today", "03/25/2024"]).is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-3").is_err());
        assert_eq!(parse_month("2024-03"), Ok("2024-03".to_string()));
    }
}
