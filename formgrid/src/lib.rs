pub mod document;
pub mod event;
pub mod focus;
pub mod grid;

pub use document::{Cell, Input, InputId, InputKind, Row, Table};
pub use event::{EventResult, Key, KeyEvent, Modifiers};
pub use focus::{FocusState, FocusTarget};
pub use grid::{Bounds, CellPos, Direction, GridIndex, GridNavigator, PROXY_INPUT_ID};
