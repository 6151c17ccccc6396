//! Errors that end the program.

use std::path::PathBuf;

use tableedit::TransportError;
use tableedit::error::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture: {0}")]
    Fixture(#[source] serde_json::Error),

    #[error(transparent)]
    Editor(#[from] tableedit::Error),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::Editor(error.into())
    }
}

impl From<TransportError> for AppError {
    fn from(error: TransportError) -> Self {
        Self::Editor(error.into())
    }
}
