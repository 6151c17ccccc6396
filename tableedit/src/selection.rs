//! Row selection through per-row checkboxes.
//!
//! The selection is whatever row checkboxes are checked; the header checkbox
//! only pushes its state onto the enabled ones.

use crate::table::{ListTable, RowId};

/// Rows whose checked state changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    pub added: Vec<RowId>,
    pub removed: Vec<RowId>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl ListTable {
    /// Header checkbox changed: check or uncheck every enabled row checkbox
    /// and mark its row accordingly. Disabled checkboxes are left alone.
    pub fn toggle_all(&mut self, checked: bool) -> SelectionChange {
        let mut change = SelectionChange::default();
        for row in &mut self.rows {
            let Some(check) = row.check.as_mut().filter(|c| c.enabled) else {
                continue;
            };
            if check.checked != checked {
                if checked {
                    change.added.push(row.id.clone());
                } else {
                    change.removed.push(row.id.clone());
                }
            }
            check.checked = checked;
            row.selected = checked;
        }
        log::debug!(
            "[selection] toggle_all checked={} added={} removed={}",
            checked,
            change.added.len(),
            change.removed.len()
        );
        change
    }

    /// A row checkbox changed directly. Returns false for rows without a
    /// usable checkbox.
    pub fn set_row_checked(&mut self, id: &RowId, checked: bool) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        let Some(check) = row.check.as_mut().filter(|c| c.enabled) else {
            return false;
        };
        check.checked = checked;
        row.selected = checked;
        true
    }

    /// Ids of the rows whose checkbox is checked, in table order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|r| r.check.as_ref().is_some_and(|c| c.checked))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Values of the checked row checkboxes, in table order.
    pub fn selected_values(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.check.as_ref())
            .filter(|c| c.checked)
            .map(|c| c.value.clone())
            .collect()
    }

    /// Write the checked values, comma-joined, into `target` (a hidden field
    /// of a bulk-action form).
    pub fn set_checked(&self, target: &mut String) -> &Self {
        *target = self.selected_values().join(",");
        self
    }

    /// Display state for the header checkbox: every enabled row checked.
    pub fn all_selected(&self) -> bool {
        let mut enabled = self
            .rows
            .iter()
            .filter_map(|r| r.check.as_ref())
            .filter(|c| c.enabled)
            .peekable();
        enabled.peek().is_some() && enabled.all(|c| c.checked)
    }
}
