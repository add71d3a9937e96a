use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::logging::DEFAULT_FILTER;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Settings for the export pipeline, stored at `~/.ems/config.json`.
///
/// The struct is passed explicitly to every component that needs it. Nothing
/// in the workspace reads these values from a global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Root URL of the employee records API.
    pub base_url: String,
    /// Shared directory every artifact is written into.
    pub exports_dir: PathBuf,
    /// Directory for rotated log files.
    pub logs_dir: PathBuf,
    /// Per-request timeout for the records API.
    pub request_timeout_secs: u64,
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let base = Self::base_dir().unwrap_or_else(|_| PathBuf::from(".ems"));
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            exports_dir: base.join("exports"),
            logs_dir: base.join("logs"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_FILTER.into(),
        }
    }
}

impl ExportConfig {
    /// Returns the base config directory: `~/.ems/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".ems"))
    }

    /// Returns the config file path: `~/.ems/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Load config from a JSON file, or return defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<ExportConfig>(&data) {
                    Ok(config) => return config,
                    Err(e) => warn!("Corrupt config file, using defaults: {e}"),
                },
                Err(e) => warn!("Cannot read config file, using defaults: {e}"),
            }
        }
        Self::default()
    }

    /// Save the config as pretty JSON, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Override fields from `EMS_BASE_URL`, `EMS_EXPORTS_DIR` and `EMS_LOG_LEVEL`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("EMS_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(dir) = lookup("EMS_EXPORTS_DIR").filter(|v| !v.is_empty()) {
            self.exports_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("EMS_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
    }

    /// Reject settings no export could run with.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_url must use http or https, got {}", url.scheme());
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// `base_url` without a trailing slash, ready for path concatenation.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
