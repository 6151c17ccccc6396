use std::fmt;

use crate::form::EditForm;
use crate::placement::BoxPlacement;
use crate::table::{ColumnId, RowId};

/// Identity of one edit box. Tokens increase monotonically per editor, so a
/// completion can tell whether its box is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(pub(crate) u64);

impl SessionToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The cell an edit box was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub row: RowId,
    pub column: ColumnId,
}

impl EditTarget {
    pub fn new(row: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            row: RowId::new(row),
            column: ColumnId::new(column),
        }
    }
}

/// Lifecycle phase of an open edit box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the edit form.
    Loading,
    /// Form shown, submit enabled.
    Open,
    /// Submit in flight, submit control disabled.
    Submitting,
    /// A transport failure was reported; only closing or re-opening helps.
    Failed,
}

/// The single open edit box.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub(super) token: SessionToken,
    pub(super) target: EditTarget,
    pub(super) placement: BoxPlacement,
    pub(super) phase: Phase,
    pub(super) content: Option<String>,
    pub(super) form: Option<EditForm>,
    pub(super) submit_disabled: bool,
    pub(super) focused_field: Option<String>,
}

impl EditSession {
    pub(super) fn loading(token: SessionToken, target: EditTarget, placement: BoxPlacement) -> Self {
        Self {
            token,
            target,
            placement,
            phase: Phase::Loading,
            content: None,
            form: None,
            submit_disabled: false,
            focused_field: None,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    pub fn placement(&self) -> BoxPlacement {
        self.placement
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Server markup shown in the box; `None` while the spinner shows.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.submit_disabled
    }

    /// Field that received focus when the content arrived.
    pub fn focused_field(&self) -> Option<&str> {
        self.focused_field.as_deref()
    }

    /// A submit request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }
}
