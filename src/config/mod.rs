//! Configuration management.
//!
//! This module resolves the data directory, the database path, the sync
//! settings in `~/.wt/config.json`, and the active date.
//!
//! # Layout
//!
//! - **Database**: `~/.wt/data/wt.db` (or `~/.wt/test/wt.db` in test mode)
//! - **Config**: `~/.wt/config.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{format_date, parse_date};

/// Server used when neither the environment nor config names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Request timeout used when neither the environment nor config sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get the global wt directory location (`~/.wt/`).
#[must_use]
pub fn global_wt_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".wt"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `WT_TEST_DB=1` (or any non-empty value
/// other than `0` / `false`). It redirects the database to an isolated file.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("WT_TEST_DB").is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test database path (`~/.wt/test/wt.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_wt_dir().map(|dir| dir.join("test").join("wt.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag, which also reads `WT_DB`)
/// 2. `WT_TEST_DB` test mode → `~/.wt/test/wt.db`
/// 3. `~/.wt/data/wt.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_wt_dir().map(|dir| dir.join("data").join("wt.db"))
}

/// Like [`resolve_db_path`], but fails if the database was never created.
///
/// # Errors
///
/// Returns `Error::NotInitialized` if the file does not exist, or
/// `Error::Config` if no home directory can be determined.
pub fn require_db_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    let path = resolve_db_path(explicit_path)
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;
    if !path.exists() {
        return Err(Error::NotInitialized);
    }
    Ok(path)
}

/// Settings persisted in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WtConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Account used by the last successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Get the config file path (`WT_CONFIG`, else `~/.wt/config.json`).
///
/// # Errors
///
/// Returns `Error::Config` if no home directory can be determined.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("WT_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    global_wt_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

impl WtConfig {
    /// Load from the default config path; a missing file is the default config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load from `path`; a missing file is the default config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
    }

    /// Save to the default config path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
    }

    /// Resolve the sync server URL.
    ///
    /// Priority: `WT_SERVER_URL` > config > [`DEFAULT_SERVER_URL`].
    #[must_use]
    pub fn resolve_server_url(&self) -> String {
        non_empty_env("WT_SERVER_URL")
            .or_else(|| self.server_url.clone().filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Resolve the per-request timeout.
    ///
    /// Priority: `WT_TIMEOUT_SECS` > config > [`DEFAULT_TIMEOUT_SECS`].
    /// Unparseable or zero values are ignored.
    #[must_use]
    pub fn resolve_timeout(&self) -> Duration {
        let secs = non_empty_env("WT_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .or(self.timeout_secs)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Today's local date as `YYYY-MM-DD`.
#[must_use]
pub fn today() -> String {
    format_date(chrono::Local::now().date_naive())
}

/// Resolve the active date: the explicit flag if given, else today.
///
/// # Errors
///
/// Returns `Error::InvalidDate` if `explicit` is not a `YYYY-MM-DD` date.
pub fn resolve_active_date(explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(date) => parse_date(date).map(format_date),
        None => Ok(today()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/wt.db");
        assert_eq!(resolve_db_path(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_resolve_db_path_default_location() {
        let path = resolve_db_path(None).unwrap();
        assert!(path.ends_with("wt.db"));
        assert!(path.to_string_lossy().contains(".wt"));
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_wt_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("test"));
        assert!(test.ends_with("wt.db"));
        assert_ne!(global.join("data").join("wt.db"), test);
    }

    #[test]
    fn test_truthy_values() {
        for v in ["1", "true", "yes"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["", "0", "false", "FALSE"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn test_require_db_path_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.db");
        assert!(matches!(require_db_path(Some(&path)), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_config_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.json");

        assert_eq!(WtConfig::load_from(&path).unwrap(), WtConfig::default());

        let config = WtConfig {
            server_url: Some("https://sync.example.com".into()),
            email: Some("me@example.com".into()),
            timeout_secs: Some(5),
        };
        config.save_to(&path).unwrap();
        assert_eq!(WtConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_malformed_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(WtConfig::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_values_used_when_set() {
        let config = WtConfig {
            server_url: Some("https://sync.example.com".into()),
            email: None,
            timeout_secs: Some(7),
        };
        // Environment overrides are not set in the test environment.
        if std::env::var("WT_SERVER_URL").is_err() {
            assert_eq!(config.resolve_server_url(), "https://sync.example.com");
        }
        if std::env::var("WT_TIMEOUT_SECS").is_err() {
            assert_eq!(config.resolve_timeout(), Duration::from_secs(7));
            assert_eq!(
                WtConfig::default().resolve_timeout(),
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            );
        }
    }

    #[test]
    fn test_resolve_active_date() {
        assert_eq!(resolve_active_date(Some("2024-07-04")).unwrap(), "2024-07-04");
        assert!(matches!(
            resolve_active_date(Some("07/04/2024")),
            Err(Error::InvalidDate(_))
        ));
        assert_eq!(resolve_active_date(None).unwrap(), today());
    }
}
