//! HTTP transport backed by reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use crate::error::TransportError;
use crate::transport::{PostRequest, Transport};

/// Header the server uses to recognise asynchronous requests.
const REQUESTED_WITH: &str = "X-Requested-With";

/// Header carrying the CSRF token for requests whose form lacks one.
const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP [`Transport`] posting urlencoded forms to the list page.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use tableedit::HttpTransport;
///
/// let transport = HttpTransport::builder()
///     .url("https://admin.example.com/catalog/products/")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

struct HttpTransportInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
    csrf_token: Option<String>,
}

impl HttpTransport {
    /// Creates a new builder for constructing a transport.
    pub fn builder() -> HttpTransportBuilder<Missing> {
        HttpTransportBuilder::new()
    }

    /// Returns the page URL requests are posted to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn resolve(&self, path: Option<&str>) -> Result<Url, TransportError> {
        match path {
            None => Ok(self.inner.base_url.clone()),
            Some(path) => self
                .inner
                .base_url
                .join(path)
                .map_err(|_| TransportError::InvalidUrl(path.to_string())),
        }
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        match (error.is_timeout(), self.inner.timeout) {
            (true, Some(timeout)) => TransportError::Timeout(timeout),
            _ => TransportError::Network(error),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &PostRequest) -> Result<String, TransportError> {
        let url = self.resolve(request.path.as_deref())?;
        log::debug!("[http] POST {} ({} fields)", url, request.form.len());

        let mut builder = self
            .inner
            .http_client
            .post(url)
            .header(REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(&request.form);

        if let Some(token) = &self.inner.csrf_token {
            builder = builder.header(CSRF_HEADER, token.as_str());
        }

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();

        if status.is_success() {
            response.text().await.map_err(|e| self.map_error(e))
        } else {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[http] POST failed with {}", status);
            Err(TransportError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
                body: (!body.is_empty()).then_some(body),
            })
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpTransport`].
///
/// The page URL is required before `build` becomes available.
pub struct HttpTransportBuilder<U> {
    url: U,
    csrf_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpTransportBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            csrf_token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the page URL.
    pub fn url(self, url: impl Into<String>) -> HttpTransportBuilder<Set<String>> {
        HttpTransportBuilder {
            url: Set(url.into()),
            csrf_token: self.csrf_token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpTransportBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpTransportBuilder<U> {
    /// Sends the CSRF token as a header on every request.
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpTransportBuilder<Set<String>> {
    /// Builds the [`HttpTransport`].
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let base_url = Url::parse(&self.url.0)
            .map_err(|_| TransportError::InvalidUrl(self.url.0.clone()))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpTransport {
            inner: Arc::new(HttpTransportInner {
                base_url,
                http_client,
                timeout: self.timeout,
                csrf_token: self.csrf_token,
            }),
        })
    }
}
