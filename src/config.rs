//! Environment-driven runtime configuration.
//!
//! All knobs come from the process environment; defaults put CMS data under
//! `~/.stanza` so everything user-level lives in one directory.

use std::path::PathBuf;

use tracing::debug;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "STANZA_DATA_DIR";
/// Environment variable selecting JSON log output (`1`/`true`).
pub const LOG_JSON_ENV_VAR: &str = "STANZA_LOG_JSON";
/// Environment variable selecting log rotation (`daily`/`hourly`/`never`).
pub const LOG_ROTATION_ENV_VAR: &str = "STANZA_LOG_ROTATION";

/// Runtime configuration for the CMS core.
#[derive(Debug, Clone, PartialEq)]
pub struct CmsConfig {
    /// Directory holding the file store's collection files.
    pub data_dir: PathBuf,
    /// Whether logs are emitted as JSON.
    pub log_json: bool,
    /// Log rotation period name, fed to `logging::parse_rotation`.
    pub log_rotation: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_json: false,
            log_rotation: "daily".to_string(),
        }
    }
}

impl CmsConfig {
    /// Build a config from the process environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let log_json = std::env::var(LOG_JSON_ENV_VAR)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let log_rotation = std::env::var(LOG_ROTATION_ENV_VAR).unwrap_or_else(|_| "daily".into());

        let config = Self {
            data_dir,
            log_json,
            log_rotation,
        };
        debug!(data_dir = %config.data_dir.display(), "Resolved CMS configuration");
        config
    }
}

/// Canonical data directory (`~/.stanza/data`).
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stanza")
        .join("data")
}
