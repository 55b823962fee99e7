//! Workbench configuration (`patrev.toml`).
//!
//! Parsed from `patrev.toml` in the working directory. Missing fields use
//! sensible defaults. Missing file → all defaults (no error).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level workbench configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct WorkbenchConfig {
    /// Data-source settings.
    #[serde(default)]
    pub data: DataConfig,

    /// UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl WorkbenchConfig {
    /// The config file name looked up in the working directory.
    pub const FILE_NAME: &'static str = "patrev.toml";

    /// Load configuration from `<dir>/patrev.toml`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(Self::FILE_NAME);
        let contents = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path),
                    message: format!("read failed: {e}"),
                });
            }
        };

        toml::from_str(&contents).map_err(|e| ConfigError {
            path: Some(path),
            message: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// DataConfig
// ---------------------------------------------------------------------------

/// Where the record set comes from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Optional path to a JSON pattern file overriding the built-in
    /// sample set.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// UI behaviour settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// How long a toast notification stays visible, in seconds.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
        }
    }
}

const fn default_toast_secs() -> u64 {
    3
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration file could not be loaded or parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    /// Path to the offending file, when known.
    pub path: Option<PathBuf>,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "config error in '{}': {}", path.display(), self.message),
            None => write!(f, "config error: {}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkbenchConfig::load(dir.path()).unwrap();
        assert_eq!(config, WorkbenchConfig::default());
        assert_eq!(config.ui.toast_secs, 3);
        assert!(config.data.path.is_none());
    }

    #[test]
    fn full_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(WorkbenchConfig::FILE_NAME),
            "[data]\npath = \"records.json\"\n\n[ui]\ntoast_secs = 5\n",
        )
        .unwrap();

        let config = WorkbenchConfig::load(dir.path()).unwrap();
        assert_eq!(config.data.path, Some(PathBuf::from("records.json")));
        assert_eq!(config.ui.toast_secs, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(WorkbenchConfig::FILE_NAME),
            "[ui]\ntoast_secs = 10\n",
        )
        .unwrap();

        let config = WorkbenchConfig::load(dir.path()).unwrap();
        assert!(config.data.path.is_none());
        assert_eq!(config.ui.toast_secs, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(WorkbenchConfig::FILE_NAME),
            "[ui]\ncolor = \"mauve\"\n",
        )
        .unwrap();

        let err = WorkbenchConfig::load(dir.path()).unwrap_err();
        assert!(err.path.is_some());
        assert!(err.message.contains("color"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WorkbenchConfig::FILE_NAME), "[ui\n").unwrap();
        assert!(WorkbenchConfig::load(dir.path()).is_err());
    }

    #[test]
    fn config_error_display_includes_path() {
        let err = ConfigError {
            path: Some(PathBuf::from("patrev.toml")),
            message: "bad".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("patrev.toml"));
        assert!(msg.contains("bad"));
    }
}
