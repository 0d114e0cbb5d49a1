use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const INGEST_HELP_COMMAND: &str = "almoner ingest --help";
pub(crate) const INGEST_HELP_SECTION_TITLE: &str = "Ingestion Troubleshooting";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CoreError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl CoreError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_ingest_help_data(self, data: Value) -> Self {
        self.with_data(merge_ingest_help_data(data))
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `almoner {cmd} --help` for usage."),
            None => "Run `almoner --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn ingest_too_few_lines(line_count: usize) -> Self {
        Self::new(
            "ingest_too_few_lines",
            &format!(
                "CSV text needs a header line and at least one data line; found {line_count} line(s). No rows were processed."
            ),
            vec![
                "Check that the file is not empty and that the first line holds the column headers.".to_string(),
                "Rerun `almoner ingest <path>`.".to_string(),
            ],
        )
        .with_ingest_help_data(json!({
            "line_count": line_count,
        }))
    }

    pub fn ingest_required_column_unmapped(missing_fields: Vec<String>, headers: Vec<String>) -> Self {
        Self::new(
            "ingest_required_column_unmapped",
            &format!(
                "Required column(s) could not be mapped: {}. No rows were processed.",
                missing_fields.join(", ")
            ),
            vec![
                "Rename the source headers so they mention date, description and amount.".to_string(),
                "Or map them explicitly, e.g. `--map amount=\"Gift (USD)\"`.".to_string(),
            ],
        )
        .with_ingest_help_data(json!({
            "missing_fields": missing_fields,
            "headers": headers,
        }))
    }

    pub fn ingest_mapped_column_missing(field: &str, header: &str, headers: Vec<String>) -> Self {
        Self::new(
            "ingest_mapped_column_missing",
            &format!("Field `{field}` is mapped to header `{header}`, which is not in the CSV header row."),
            vec![
                "Check the spelling of the header passed to `--map`.".to_string(),
                "Headers are matched exactly after trimming.".to_string(),
            ],
        )
        .with_ingest_help_data(json!({
            "field": field,
            "header": header,
            "headers": headers,
        }))
    }

    pub fn transaction_not_found(id: &str) -> Self {
        Self::new(
            "transaction_not_found",
            &format!("Transaction `{id}` was not found in the ledger."),
            vec!["Take a fresh ledger snapshot and retry with a current transaction id.".to_string()],
        )
        .with_data(json!({
            "id": id,
        }))
    }

    pub fn invalid_transaction(message: &str) -> Self {
        Self::new(
            "invalid_transaction",
            message,
            vec![
                "Amounts must be positive; the sign lives in the transaction type.".to_string(),
                "Descriptions must be non-empty.".to_string(),
            ],
        )
    }

    pub fn unreadable_input(path: &str, detail: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Could not read input `{path}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Use `-` to read the input from stdin.".to_string(),
            ],
        )
    }

    pub fn malformed_snapshot(kind: &str, path: &str, detail: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("The {kind} snapshot `{path}` is not valid JSON for this command: {detail}"),
            vec![
                format!("Run `almoner --help` to review the {kind} snapshot format."),
                "Fix the file and rerun the command.".to_string(),
            ],
        )
        .with_data(json!({
            "snapshot_kind": kind,
            "path": path,
        }))
    }

    pub fn ledger_write_failed(path: &str, detail: &str) -> Self {
        Self::new(
            "ledger_write_failed",
            &format!("Could not write the ledger snapshot `{path}`: {detail}"),
            vec![
                "Check that the directory exists and is writable.".to_string(),
                "Rerun without `--append-to` to preview the rows first.".to_string(),
            ],
        )
        .with_data(json!({
            "path": path,
        }))
    }

    pub fn settings_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "settings_invalid",
            &format!("Settings file `{location}` could not be parsed: {detail}"),
            vec![
                format!("Fix or remove `{location}`; defaults apply when it is absent."),
                "Or point `ALMONER_HOME` at a different directory.".to_string(),
            ],
        )
    }

    pub fn home_unresolved(detail: &str) -> Self {
        Self::new(
            "internal_home_unresolved",
            &format!("Could not resolve the settings directory: {detail}"),
            vec!["Set `ALMONER_HOME` to a readable directory.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_ingest_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(INGEST_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(INGEST_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn ingest_errors_carry_help_pointers() {
        let error = CoreError::ingest_too_few_lines(1);
        assert_eq!(error.code, "ingest_too_few_lines");
        let data = error.data.unwrap_or_default();
        assert_eq!(data["help_command"], "almoner ingest --help");
        assert_eq!(data["line_count"], 1);
    }

    #[test]
    fn invalid_argument_for_command_records_hint() {
        let error = CoreError::invalid_argument_for_command("bad", Some("summary"));
        assert_eq!(error.recovery_steps, vec!["Run `almoner summary --help` for usage."]);
        assert!(error.data.is_some());
    }
}
