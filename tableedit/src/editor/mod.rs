//! The inline edit box and its network lifecycle.
//!
//! One [`TableEditor`] per page owns the single edit-box slot. Opening a box
//! evicts the previous one; every request carries the [`SessionToken`] of the
//! box that issued it, and completions for evicted boxes are dropped.

mod controller;
mod events;
mod request;
mod session;

pub use controller::{EditorState, TableEditor};
pub use events::EditorEvent;
pub use request::{Completion, PendingRequest, RequestKind};
pub use session::{EditSession, EditTarget, Phase, SessionToken};
