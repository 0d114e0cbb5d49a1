use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::identity::Member;
use crate::input::{STDIN_PATH, resolve_source};
use crate::ledger::{BudgetStore, MemoryBudgets, MemoryLedger, MonthKey, Transaction};
use crate::{CoreError, CoreResult};

/// A snapshot file loaded into memory, remembering where it came from.
pub(crate) struct Loaded<T> {
    pub(crate) source: String,
    pub(crate) value: T,
}

pub(crate) fn load_ledger(path: &str, stdin_override: Option<String>) -> CoreResult<Loaded<MemoryLedger>> {
    let loaded = load_json::<Vec<Transaction>>("ledger", path, stdin_override)?;
    tracing::debug!(source = %loaded.source, rows = loaded.value.len(), "loaded ledger snapshot");
    Ok(Loaded {
        source: loaded.source,
        value: MemoryLedger::from_transactions(loaded.value),
    })
}

/// Like [`load_ledger`], but a file that does not exist yet is an empty ledger.
/// The path must name a file: the ledger is written back to it.
pub(crate) fn load_ledger_or_empty(path: &str) -> CoreResult<Loaded<MemoryLedger>> {
    if path == STDIN_PATH {
        return Err(CoreError::invalid_argument_for_command(
            "`--append-to` needs a ledger file path; `-` cannot be written back.",
            Some("ingest"),
        ));
    }
    if !Path::new(path).exists() {
        return Ok(Loaded {
            source: path.to_string(),
            value: MemoryLedger::new(),
        });
    }
    load_ledger(path, None)
}

/// Stdin holds one snapshot, so at most one of `paths` may be `-`.
pub(crate) fn ensure_single_stdin(command: &str, paths: [(&str, Option<&str>); 2]) -> CoreResult<()> {
    let [(first, first_path), (second, second_path)] = paths;
    if first_path == Some(STDIN_PATH) && second_path == Some(STDIN_PATH) {
        return Err(CoreError::invalid_argument_for_command(
            &format!("Only one of the {first} and {second} snapshots can be read from stdin."),
            Some(command),
        ));
    }
    Ok(())
}

pub(crate) fn load_budgets(
    path: &str,
    stdin_override: Option<String>,
) -> CoreResult<Loaded<MemoryBudgets>> {
    let loaded =
        load_json::<BTreeMap<MonthKey, BTreeMap<String, f64>>>("budgets", path, stdin_override)?;
    let mut store = MemoryBudgets::new();
    for (month, allocations) in loaded.value {
        store.set(month, allocations);
    }
    Ok(Loaded {
        source: loaded.source,
        value: store,
    })
}

pub(crate) fn load_members(path: &str, stdin_override: Option<String>) -> CoreResult<Loaded<Vec<Member>>> {
    load_json::<Vec<Member>>("members", path, stdin_override)
}

pub(crate) fn write_ledger(path: &str, transactions: &[Transaction]) -> CoreResult<()> {
    let body = serde_json::to_string_pretty(transactions)
        .map_err(|error| CoreError::internal_serialization(&error.to_string()))?;
    fs::write(path, format!("{body}\n"))
        .map_err(|error| CoreError::ledger_write_failed(path, &error.to_string()))?;
    tracing::info!(path, rows = transactions.len(), "wrote ledger snapshot");
    Ok(())
}

fn load_json<T>(kind: &str, path: &str, stdin_override: Option<String>) -> CoreResult<Loaded<T>>
where
    T: DeserializeOwned,
{
    let source = resolve_source(path, stdin_override)?;
    let value = serde_json::from_str::<T>(&source.content)
        .map_err(|error| CoreError::malformed_snapshot(kind, &source.source_ref, &error.to_string()))?;
    Ok(Loaded {
        source: source.source_ref,
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{
        ensure_single_stdin, load_budgets, load_ledger, load_ledger_or_empty, load_members,
        write_ledger,
    };
    use crate::ledger::{BudgetStore, LedgerStore, MonthKey};

    const LEDGER: &str = r#"[
        {"id": "t1", "date": "2024-03-03", "description": "Sunday Offering", "category": "Offerings", "amount": 120.0, "type": "income", "donor_name": "Ann"},
        {"id": "t2", "date": "2024-03-04", "description": "Power", "category": "Utilities", "amount": 80.0, "type": "expense"}
    ]"#;

    #[test]
    fn ledger_snapshot_loads_from_stdin() {
        let loaded = load_ledger("-", Some(LEDGER.to_string()));
        assert!(loaded.is_ok());
        if let Ok(value) = loaded {
            assert_eq!(value.source, "-");
            let snapshot = value.value.snapshot();
            assert_eq!(snapshot.len(), 2);
            assert_eq!(snapshot[0].donor_name.as_deref(), Some("Ann"));
        }
    }

    #[test]
    fn malformed_snapshot_names_its_kind() {
        let loaded = load_members("-", Some("{\"id\": 1}".to_string()));
        assert!(loaded.is_err());
        if let Err(error) = loaded {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("members"));
        }
    }

    #[test]
    fn budgets_drop_zero_allocations_on_load() {
        let raw = r#"{"2024-03": {"Utilities": 500, "Supplies": 0}, "2024-04": {"Rent": 0}}"#;
        let loaded = load_budgets("-", Some(raw.to_string()));
        assert!(loaded.is_ok());
        if let Ok(value) = loaded {
            let march = MonthKey::new(2024, 3);
            assert!(march.is_some());
            if let Some(month) = march {
                let budget = value.value.get(month);
                assert_eq!(budget.len(), 1);
                assert_eq!(budget.get("Supplies"), 0.0);
            }
            let april = MonthKey::new(2024, 4);
            assert!(april.is_some_and(|month| value.value.get(month).is_empty()));
        }
    }

    #[test]
    fn written_ledger_reloads() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let path = dir.path().join("ledger.json").display().to_string();
            let empty = load_ledger_or_empty(&path);
            assert!(empty.is_ok_and(|loaded| loaded.value.is_empty()));

            let loaded = load_ledger("-", Some(LEDGER.to_string()));
            assert!(loaded.is_ok());
            if let Ok(value) = loaded {
                assert!(write_ledger(&path, &value.value.snapshot()).is_ok());
            }
            let body = fs::read_to_string(&path);
            assert!(body.is_ok_and(|text| text.contains("\"type\": \"expense\"")));
            let reloaded = load_ledger_or_empty(&path);
            assert!(reloaded.is_ok_and(|loaded| loaded.value.len() == 2));
        }
    }

    #[test]
    fn stdin_serves_one_snapshot_per_command() {
        assert!(ensure_single_stdin("donors", [("ledger", Some("-")), ("members", None)]).is_ok());
        assert!(
            ensure_single_stdin("donors", [("ledger", Some("l.json")), ("members", Some("-"))])
                .is_ok()
        );

        let doubled = ensure_single_stdin("donors", [("ledger", Some("-")), ("members", Some("-"))]);
        assert!(doubled.is_err());
        if let Err(error) = doubled {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("ledger and members"));
        }
    }

    #[test]
    fn append_target_must_be_a_file() {
        let target = load_ledger_or_empty("-");
        assert!(target.is_err());
        if let Err(error) = target {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("--append-to"));
        }
    }
}
