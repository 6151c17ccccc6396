//! Spreadsheet-style keyboard navigation over a formset table.
//!
//! The grid keeps a virtual cursor that is independent of browser focus.
//! Navigation keys are captured by an off-screen proxy input; typing on the
//! proxy hands focus to the text input under the cursor.

mod cursor;
mod index;
mod navigator;

pub use cursor::{Bounds, CellPos, Direction};
pub use index::GridIndex;
pub use navigator::{GridNavigator, PROXY_INPUT_ID};
