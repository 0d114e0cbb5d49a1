use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingest::CategoryCatalog;
use crate::{CoreError, CoreResult};

pub const HOME_ENV_VAR: &str = "ALMONER_HOME";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let catalog = CategoryCatalog::default();
        Self {
            income_categories: catalog.income,
            expense_categories: catalog.expense,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    pub fn catalog(&self) -> CategoryCatalog {
        CategoryCatalog {
            income: self.income_categories.clone(),
            expense: self.expense_categories.clone(),
        }
    }
}

/// Explicit override, else `ALMONER_HOME`, else `~/.almoner`.
pub fn resolve_home(home_override: Option<&Path>) -> CoreResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV_VAR) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".almoner")
            } else {
                return Err(CoreError::home_unresolved(
                    "no home directory is known for the current user",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE_NAME)
}

/// Loads `settings.json` from the resolved home. A missing file means
/// defaults; fields absent from the file keep their defaults too.
pub fn load_settings(home_override: Option<&Path>) -> CoreResult<Settings> {
    let home = resolve_home(home_override)?;
    let path = settings_path(&home);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&path)
        .map_err(|error| CoreError::settings_invalid(&path, &error.to_string()))?;
    let settings = serde_json::from_str::<Settings>(&raw)
        .map_err(|error| CoreError::settings_invalid(&path, &error.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn absolutize(path: &Path) -> CoreResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| CoreError::home_unresolved(&error.to_string()))
}
