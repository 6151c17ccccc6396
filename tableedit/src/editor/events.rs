use crate::placement::BoxPlacement;
use crate::table::RowId;

use super::session::{EditTarget, SessionToken};

/// UI effects the host applies after driving the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A new box appeared at `placement`, showing a spinner.
    BoxOpened {
        token: SessionToken,
        target: EditTarget,
        placement: BoxPlacement,
    },
    /// The box interior was replaced with server markup.
    ContentReplaced { token: SessionToken },
    /// Focus this field and select its content.
    FocusField { token: SessionToken, name: String },
    /// The new markup holds autocomplete fields that need initialising.
    InitAutocomplete,
    /// The submit control was disabled.
    SubmitDisabled { token: SessionToken },
    /// The row's markup was replaced by the server rendering.
    RowReplaced { row: RowId },
    /// The box was removed from the document.
    BoxClosed { token: SessionToken },
    /// Blocking notification, `status:error`.
    Alert { message: String },
}
