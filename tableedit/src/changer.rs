//! Asynchronous status toggles.
//!
//! A changer is a small control in a table cell (for example an "active"
//! flag) that POSTs to its own URL and switches its icon to whatever state
//! the server reports back.

use crate::error::TransportError;
use crate::protocol::{ChangerResponse, FormData};
use crate::transport::PostRequest;

/// Icon classes used when a control does not declare its own.
pub const DEFAULT_ICONS: &str = "negative fa-minus-circle,positive fa-check-circle";

/// What a completed changer request did to the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangerOutcome {
    /// Empty response; nothing to show.
    Unchanged,
    /// The control now shows the icon at this index, or no icon if the
    /// server sent no value or one outside the icon list.
    Switched(Option<usize>),
    /// The server refused the change; the message is shown to the user.
    Rejected(String),
    /// The request itself failed; the message is shown to the user.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changer {
    url: String,
    confirm: Option<String>,
    icons: Vec<String>,
    current: Option<usize>,
    loading: bool,
}

impl Changer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            confirm: None,
            icons: parse_icons(DEFAULT_ICONS),
            current: None,
            loading: false,
        }
    }

    /// Ask the user before posting, using `title` as the question.
    pub fn with_confirm(mut self, title: impl Into<String>) -> Self {
        self.confirm = Some(title.into());
        self
    }

    /// Comma-separated icon classes, one per server value.
    pub fn with_icons(mut self, icons: &str) -> Self {
        self.icons = parse_icons(icons);
        self
    }

    /// Initial icon index as rendered by the server.
    pub fn with_value(mut self, value: usize) -> Self {
        self.current = (value < self.icons.len()).then_some(value);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn confirm_title(&self) -> Option<&str> {
        self.confirm.as_deref()
    }

    pub fn icons(&self) -> &[String] {
        &self.icons
    }

    pub fn value(&self) -> Option<usize> {
        self.current
    }

    /// Icon class currently shown.
    pub fn icon(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.icons.get(i))
            .map(String::as_str)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Control clicked. Returns the request to send, or `None` if a request
    /// is already in flight or the user declined the confirmation.
    pub fn activate<F>(&mut self, confirm: F) -> Option<PostRequest>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.loading {
            log::debug!("[changer] {} busy, click ignored", self.url);
            return None;
        }
        if let Some(title) = &self.confirm
            && !confirm(title)
        {
            return None;
        }
        self.loading = true;
        log::debug!("[changer] POST {}", self.url);
        Some(PostRequest::to(self.url.clone(), FormData::new()))
    }

    /// Apply the outcome of the request returned by [`activate`](Self::activate).
    pub fn complete(&mut self, result: Result<String, TransportError>) -> ChangerOutcome {
        self.loading = false;

        let response = match result.and_then(|body| ChangerResponse::decode(&body)) {
            Ok(Some(response)) => response,
            Ok(None) => return ChangerOutcome::Unchanged,
            Err(error) => {
                log::warn!("[changer] {} failed: {}", self.url, error);
                return ChangerOutcome::Failed(error.alert_message());
            }
        };

        if let Some(message) = response.error {
            log::debug!("[changer] {} rejected: {}", self.url, message);
            return ChangerOutcome::Rejected(message);
        }

        self.current = response.value.filter(|&v| v < self.icons.len());
        ChangerOutcome::Switched(self.current)
    }
}

fn parse_icons(icons: &str) -> Vec<String> {
    icons.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_sets_loading_and_ignores_second_click() {
        let mut changer = Changer::new("/admin/products/7/active/");
        let request = changer.activate(|_| true).unwrap();
        assert_eq!(request.path.as_deref(), Some("/admin/products/7/active/"));
        assert!(request.form.is_empty());
        assert!(changer.is_loading());
        assert!(changer.activate(|_| true).is_none());
    }

    #[test]
    fn test_declined_confirmation_sends_nothing() {
        let mut changer = Changer::new("/toggle/").with_confirm("Really?");
        let mut asked = None;
        assert!(
            changer
                .activate(|title| {
                    asked = Some(title.to_string());
                    false
                })
                .is_none()
        );
        assert_eq!(asked.as_deref(), Some("Really?"));
        assert!(!changer.is_loading());
    }

    #[test]
    fn test_value_switches_icon() {
        let mut changer = Changer::new("/toggle/").with_value(0);
        assert_eq!(changer.icon(), Some("negative fa-minus-circle"));
        changer.activate(|_| true);
        let outcome = changer.complete(Ok(r#"{"value": 1}"#.to_string()));
        assert_eq!(outcome, ChangerOutcome::Switched(Some(1)));
        assert_eq!(changer.icon(), Some("positive fa-check-circle"));
        assert!(!changer.is_loading());
    }

    #[test]
    fn test_error_keeps_icon() {
        let mut changer = Changer::new("/toggle/").with_value(1);
        changer.activate(|_| true);
        let outcome = changer.complete(Ok(r#"{"error": "locked"}"#.to_string()));
        assert_eq!(outcome, ChangerOutcome::Rejected("locked".into()));
        assert_eq!(changer.value(), Some(1));
    }

    #[test]
    fn test_empty_body_is_ignored() {
        let mut changer = Changer::new("/toggle/").with_value(1);
        changer.activate(|_| true);
        assert_eq!(changer.complete(Ok(String::new())), ChangerOutcome::Unchanged);
        assert_eq!(changer.value(), Some(1));
    }

    #[test]
    fn test_out_of_range_value_clears_icon() {
        let mut changer = Changer::new("/toggle/").with_icons("off, on, pending");
        assert_eq!(changer.icons().len(), 3);
        changer.activate(|_| true);
        assert_eq!(
            changer.complete(Ok(r#"{"value": 5}"#.to_string())),
            ChangerOutcome::Switched(None)
        );
        assert_eq!(changer.icon(), None);
    }

    #[test]
    fn test_transport_failure_clears_loading() {
        let mut changer = Changer::new("/toggle/");
        changer.activate(|_| true);
        let outcome = changer.complete(Err(TransportError::http(403, "Forbidden")));
        assert_eq!(outcome, ChangerOutcome::Failed("error:Forbidden".into()));
        assert!(!changer.is_loading());
    }
}
