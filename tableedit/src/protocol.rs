//! Wire format shared with the server-side list view.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Ordered form fields, sent as `application/x-www-form-urlencoded`.
///
/// Names may repeat (multi-selects), so this is a list of pairs rather than
/// a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

/// Response to both the load and the submit request.
///
/// With `success: true` a load carries the edit form and a submit carries the
/// replacement row; with `success: false` a submit carries the form again,
/// annotated with validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResponse {
    pub success: bool,
    #[serde(default)]
    pub content: String,
}

impl EditResponse {
    pub fn decode(body: &str) -> Result<Self, TransportError> {
        serde_json::from_str(body)
            .map_err(|e| TransportError::parse_with_body(e.to_string(), body))
    }
}

/// Response to a status toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangerResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub value: Option<usize>,
}

impl ChangerResponse {
    /// Decodes a toggle response. An empty body means "nothing to apply".
    pub fn decode(body: &str) -> Result<Option<Self>, TransportError> {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| TransportError::parse_with_body(e.to_string(), body))
    }
}
