use crate::error::TransportError;
use crate::protocol::EditResponse;
use crate::transport::PostRequest;

use super::session::SessionToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Fetch the edit form.
    Load,
    /// Send the filled-in form.
    Submit,
}

/// A request the editor wants sent. Fire-and-forget: run it, then feed
/// [`PendingRequest::complete`] back into [`TableEditor::complete`].
///
/// [`TableEditor::complete`]: super::TableEditor::complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    token: SessionToken,
    kind: RequestKind,
    request: PostRequest,
}

impl PendingRequest {
    pub(super) fn new(token: SessionToken, kind: RequestKind, request: PostRequest) -> Self {
        Self {
            token,
            kind,
            request,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn request(&self) -> &PostRequest {
        &self.request
    }

    /// Pair the raw transport outcome with this request's session.
    pub fn complete(self, body: Result<String, TransportError>) -> Completion {
        Completion {
            token: self.token,
            kind: self.kind,
            result: body.and_then(|b| EditResponse::decode(&b)),
        }
    }
}

/// Outcome of a [`PendingRequest`], tagged with the session that issued it.
#[derive(Debug)]
pub struct Completion {
    pub token: SessionToken,
    pub kind: RequestKind,
    pub result: Result<EditResponse, TransportError>,
}
