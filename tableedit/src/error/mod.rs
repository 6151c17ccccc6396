//! Error types

mod config;
mod transport;

pub use config::*;
pub use transport::*;

/// Top-level error for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request-level failure talking to the server.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
