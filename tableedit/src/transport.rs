//! Transport trait and request type

use async_trait::async_trait;

use crate::error::TransportError;
use crate::protocol::FormData;

/// A form POST issued by one of the controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    /// Target relative to the transport's base URL; `None` posts to the base
    /// URL itself (the list page).
    pub path: Option<String>,
    pub form: FormData,
}

impl PostRequest {
    /// POST to the list page.
    pub fn to_page(form: FormData) -> Self {
        Self { path: None, form }
    }

    /// POST to another URL, resolved against the page URL.
    pub fn to(path: impl Into<String>, form: FormData) -> Self {
        Self {
            path: Some(path.into()),
            form,
        }
    }
}

/// Sends form POSTs and returns the raw response body.
///
/// Non-success statuses and network failures come back as
/// [`TransportError`]; decoding the body is up to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &PostRequest) -> Result<String, TransportError>;
}
