//! Editor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the inline table editor and its transport.
///
/// Field names default to what the server-side list view expects.
///
/// # Example
///
/// ```
/// use tableedit::EditorConfig;
///
/// let config = EditorConfig::default()
///     .with_endpoint("https://admin.example.com/catalog/products/")
///     .with_box_width(420);
/// assert_eq!(config.viewport_margin, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// URL the list page posts its edit actions to.
    pub endpoint: Option<String>,

    /// Name of the action selector field. Default: `_action`
    pub action_field: String,

    /// Action value of the load request. Default: `edit`
    pub edit_action: String,

    /// Name of the column field. Default: `_column`
    pub column_field: String,

    /// Name of the row id field. Default: `id`
    pub id_field: String,

    /// Name of the CSRF token field. Default: `csrfmiddlewaretoken`
    pub csrf_field: String,

    /// Rendered width of the edit box.
    ///
    /// Default: 400
    pub box_width: i32,

    /// Space kept between the edit box and the right edge of the document.
    ///
    /// Default: 50
    pub viewport_margin: i32,

    /// Per-request timeout in seconds, `None` for no limit.
    pub timeout_secs: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            action_field: "_action".to_string(),
            edit_action: "edit".to_string(),
            column_field: "_column".to_string(),
            id_field: "id".to_string(),
            csrf_field: "csrfmiddlewaretoken".to_string(),
            box_width: 400,
            viewport_margin: 50,
            timeout_secs: Some(30),
        }
    }
}

impl EditorConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the edit box width.
    pub fn with_box_width(mut self, width: i32) -> Self {
        self.box_width = width;
        self
    }

    /// Sets the right-edge margin.
    pub fn with_viewport_margin(mut self, margin: i32) -> Self {
        self.viewport_margin = margin;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Checks the endpoint and numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint).map_err(|source| ConfigError::Endpoint {
                url: endpoint.clone(),
                source,
            })?;
        }
        if self.box_width <= 0 {
            return Err(ConfigError::Invalid {
                field: "box_width",
                reason: format!("must be positive, got {}", self.box_width),
            });
        }
        if self.viewport_margin < 0 {
            return Err(ConfigError::Invalid {
                field: "viewport_margin",
                reason: format!("must not be negative, got {}", self.viewport_margin),
            });
        }
        Ok(())
    }
}
