//! Inline table editing
//!
//! Row selection, a single floating inline-edit box fetched and submitted
//! over HTTP, and asynchronous status toggles for server-rendered admin
//! tables. Controllers are sans-IO: they hand out tagged requests and accept
//! completions, and [`RequestDriver`] runs those requests on tokio.

pub mod changer;
pub mod config;
pub mod editor;
pub mod error;
pub mod form;
pub mod placement;
pub mod protocol;
pub mod selection;
pub mod table;
pub mod transport;

mod client;
mod driver;

pub use client::*;
pub use config::EditorConfig;
pub use driver::RequestDriver;
pub use editor::TableEditor;
pub use error::{Error, TransportError};
pub use transport::{PostRequest, Transport};
