use std::fs;
use std::io::{IsTerminal, Read};

use crate::{CoreError, CoreResult};

pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) source_ref: String,
    pub(crate) content: String,
}

/// Reads `path`, or stdin when `path` is `-`. `stdin_override` stands in for
/// the process stdin.
pub(crate) fn resolve_source(
    path: &str,
    stdin_override: Option<String>,
) -> CoreResult<ResolvedSource> {
    if path == STDIN_PATH {
        let Some(body) = read_stdin(stdin_override)? else {
            return Err(CoreError::unreadable_input(
                STDIN_PATH,
                "stdin was empty; pipe input or pass a file path",
            ));
        };
        return Ok(ResolvedSource {
            source_kind: SourceKind::Stdin,
            source_ref: STDIN_PATH.to_string(),
            content: body,
        });
    }

    let body =
        fs::read_to_string(path).map_err(|error| CoreError::unreadable_input(path, &error.to_string()))?;
    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        source_ref: path.to_string(),
        content: body,
    })
}

fn read_stdin(stdin_override: Option<String>) -> CoreResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|body| !body.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| CoreError::unreadable_input(STDIN_PATH, &error.to_string()))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}
