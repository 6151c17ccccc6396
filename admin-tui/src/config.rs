//! Application configuration, read from `config.json` in the config dir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tableedit::EditorConfig;
use tableedit::error::ConfigError;

use crate::error::AppError;

/// Page posted to when the config names no endpoint: a local dev server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/admin/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inline editor and transport settings.
    pub editor: EditorConfig,

    /// CSRF token sent with every request.
    pub csrf_token: Option<String>,

    /// Table fixture to load instead of the built-in one.
    pub fixture: Option<PathBuf>,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load from the platform config file. A missing file gives the defaults.
    pub fn load() -> Result<Self, AppError> {
        match crate::paths::config_file() {
            Some(path) => Self::from_path(&path),
            None => {
                log::warn!("[config] no home directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("[config] {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AppError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_json(&json)?;
        log::info!("[config] loaded {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.editor.validate()?;
        Ok(config)
    }

    pub fn endpoint(&self) -> &str {
        self.editor.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}
