//! Transport error types

use std::time::Duration;

/// Request-level failure of a load, submit or toggle call.
///
/// Validation failures are not errors: the server answers them with a normal
/// `success: false` response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        message: String,
        /// Raw response body, if any.
        body: Option<String>,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be decoded.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body.
        body: Option<String>,
    },
}

impl TransportError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short failure category: `error`, `timeout` or `parsererror`.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Parse { .. } => "parsererror",
            Self::Network(e) if e.is_timeout() => "timeout",
            _ => "error",
        }
    }

    /// Human-readable cause that follows the status in user notifications.
    pub fn error_text(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Network(e) => e.to_string(),
            Self::Timeout(_) => String::new(),
            Self::InvalidUrl(url) => format!("invalid URL {url}"),
            Self::Parse { message, .. } => message.clone(),
        }
    }

    /// Text of the blocking notification shown to the user: `status:error`.
    pub fn alert_message(&self) -> String {
        format!("{}:{}", self.status_text(), self.error_text())
    }
}
