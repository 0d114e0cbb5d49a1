use std::io;

use almoner_core::{CoreError, SuccessEnvelope};
use serde::Serialize;
use serde_json::Value;

/// Wire version of the `--json` contract. It moves only when a field is
/// renamed or removed.
const JSON_VERSION: &str = "v1";

const JSON_COMMANDS: [&str; 7] = [
    "summary",
    "budget",
    "donors",
    "ingest",
    "identity duplicates",
    "identity check",
    "identity suggest",
];

#[derive(Serialize)]
struct JsonSuccess<'a> {
    ok: bool,
    version: &'static str,
    data: &'a Value,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    error: JsonError<'a>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    code: &'a str,
    message: &'a str,
    recovery_steps: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    if !JSON_COMMANDS.contains(&success.command.as_str()) {
        return Err(io::Error::other(format!(
            "no JSON contract for command `{}`",
            success.command
        )));
    }
    to_pretty(&JsonSuccess {
        ok: true,
        version: JSON_VERSION,
        data: &success.data,
    })
}

pub fn render_error_json(error: &CoreError) -> io::Result<String> {
    to_pretty(&JsonFailure {
        error: JsonError {
            code: &error.code,
            message: &error.message,
            recovery_steps: &error.recovery_steps,
            data: error.data.as_ref(),
        },
    })
}

fn to_pretty(value: &impl Serialize) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use almoner_core::{CoreError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    fn parsed(rendered: std::io::Result<String>) -> Value {
        assert!(rendered.is_ok());
        rendered
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .unwrap_or(Value::Null)
    }

    #[test]
    fn every_command_shares_the_v1_envelope() {
        for command in ["summary", "donors", "identity suggest"] {
            let envelope = SuccessEnvelope {
                ok: true,
                command: command.to_string(),
                version: "0.1.0".to_string(),
                data: json!({"net_income": 250.0}),
            };
            let value = parsed(render_success_json(&envelope));
            assert_eq!(value["ok"], Value::Bool(true));
            assert_eq!(value["version"], "v1");
            assert_eq!(value["data"]["net_income"], json!(250.0));
            assert!(value.get("command").is_none());
        }
    }

    #[test]
    fn commands_without_a_contract_are_rejected() {
        let envelope = SuccessEnvelope {
            ok: true,
            command: "reconcile".to_string(),
            version: "0.1.0".to_string(),
            data: json!({}),
        };
        assert!(render_success_json(&envelope).is_err());
    }

    #[test]
    fn errors_omit_data_when_there_is_none() {
        let error = CoreError::malformed_snapshot("ledger", "ledger.json", "expected an array");
        let value = parsed(render_error_json(&error));
        assert!(value.get("ok").is_none());
        assert_eq!(value["error"]["code"], error.code.as_str());
        assert!(value["error"]["recovery_steps"].is_array());
        assert!(value["error"].get("data").is_none());
    }

    #[test]
    fn ingest_errors_carry_their_data() {
        let value = parsed(render_error_json(&CoreError::ingest_too_few_lines(1)));
        assert_eq!(value["error"]["code"], "ingest_too_few_lines");
        assert_eq!(value["error"]["data"]["line_count"], json!(1));
        assert_eq!(value["error"]["data"]["help_command"], "almoner ingest --help");
    }
}
