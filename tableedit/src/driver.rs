//! Runs controller requests on tokio and hands completions back.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::editor::{Completion, PendingRequest};
use crate::error::TransportError;
use crate::transport::{PostRequest, Transport};

/// Fire-and-forget request runner.
///
/// Each dispatched request runs on its own task; its outcome is wrapped into
/// a message of type `M` and queued for the event loop that owns the
/// controllers. Requests are never cancelled.
pub struct RequestDriver<M> {
    transport: Arc<dyn Transport>,
    tx: mpsc::UnboundedSender<M>,
}

impl<M> Clone for RequestDriver<M> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<M: Send + 'static> RequestDriver<M> {
    /// Creates a driver and the receiving end of its completion queue.
    pub fn new(transport: Arc<dyn Transport>) -> (Self, mpsc::UnboundedReceiver<M>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { transport, tx }, rx)
    }

    /// Spawn `request`; `wrap` turns its outcome into a queue message.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch<F>(&self, request: PostRequest, wrap: F)
    where
        F: FnOnce(Result<String, TransportError>) -> M + Send + 'static,
    {
        let transport = self.transport.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transport.post(&request).await;
            if tx.send(wrap(result)).is_err() {
                log::debug!("[driver] completion dropped, event loop is gone");
            }
        });
    }

    /// Spawn an editor request.
    pub fn dispatch_edit(&self, pending: PendingRequest)
    where
        M: From<Completion>,
    {
        let request = pending.request().clone();
        self.dispatch(request, move |result| M::from(pending.complete(result)));
    }
}
