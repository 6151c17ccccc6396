use crate::document::{Input, InputId, Table};
use crate::event::{EventResult, Key, KeyEvent};
use crate::focus::{FocusState, FocusTarget};

use super::cursor::{Bounds, CellPos, Direction};
use super::index::GridIndex;

/// Element id of the off-screen proxy input.
pub const PROXY_INPUT_ID: &str = "formset-input";

/// Keyboard navigation controller for one formset table.
///
/// Owns the table, the cursor and the focus state. The host forwards focus
/// changes and key presses and honors the returned [`EventResult`]: a
/// `Consumed` result means the browser default must be suppressed.
#[derive(Debug)]
pub struct GridNavigator {
    table: Table,
    index: GridIndex,
    bounds: Option<Bounds>,
    cursor: CellPos,
    marked: Option<CellPos>,
    focus: FocusState,
}

impl GridNavigator {
    /// Take over a table: normalise its inputs, index every cell and place
    /// the cursor on the first navigable cell.
    pub fn new(mut table: Table) -> Self {
        table.normalize_inputs();
        let index = GridIndex::build(&table);
        let bounds = Bounds::from_dimensions(table.column_count(), table.row_count());
        let cursor = bounds.map(|b| b.origin()).unwrap_or_default();

        log::debug!(
            "[grid] init rows={} columns={} inputs={} bounds={:?}",
            table.row_count(),
            table.column_count(),
            index.len(),
            bounds
        );

        Self {
            table,
            index,
            bounds,
            cursor,
            marked: bounds.map(|_| cursor),
            focus: FocusState::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    /// Navigable area, `None` for a grid with nothing to navigate.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn cursor(&self) -> CellPos {
        self.cursor
    }

    /// The cell carrying the cursor marker.
    pub fn marked(&self) -> Option<CellPos> {
        self.marked
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn input(&self, id: &InputId) -> Option<&Input> {
        let pos = self.index.position_of(id)?;
        self.table.cell(pos.x, pos.y)?.find(id)
    }

    pub fn input_mut(&mut self, id: &InputId) -> Option<&mut Input> {
        let pos = self.index.position_of(id)?;
        self.table.cell_mut(pos.x, pos.y)?.find_mut(id)
    }

    /// Give keyboard focus to the proxy input.
    pub fn focus_proxy(&mut self) {
        self.focus.focus(FocusTarget::Proxy);
    }

    /// An input inside the grid gained focus (mouse or tab): resync the cursor
    /// to its cell. Returns false for inputs that are not part of the grid.
    pub fn on_cell_focus(&mut self, id: &InputId) -> bool {
        let Some(pos) = self.index.position_of(id) else {
            return false;
        };
        self.focus.focus(FocusTarget::Input(id.clone()));
        if let Some(bounds) = self.bounds {
            // Focus may land in the reserved checkbox column; the cursor stays
            // inside the navigable area.
            let pos = bounds.clamp(pos);
            self.cursor = pos;
            self.marked = Some(pos);
        }
        true
    }

    /// Dispatch a key press to whichever element holds focus.
    pub fn on_key(&mut self, event: KeyEvent) -> EventResult {
        match self.focus.focused() {
            Some(FocusTarget::Proxy) => self.on_key_in_proxy(event),
            Some(FocusTarget::Input(_)) => self.on_key_in_cell(event),
            None => EventResult::Ignored,
        }
    }

    /// Key pressed while a grid input has focus.
    pub fn on_key_in_cell(&mut self, event: KeyEvent) -> EventResult {
        let Some(id) = self.focus.focused_input() else {
            return EventResult::Ignored;
        };
        let owns_vertical = self.input(id).is_some_and(|i| i.autocomplete_widget);

        match event.key {
            Key::Enter | Key::Escape => {
                self.focus_proxy();
                EventResult::Consumed
            }
            Key::Left | Key::Right => self.move_and_leave_cell(event.key),
            Key::Up | Key::Down if !owns_vertical => self.move_and_leave_cell(event.key),
            _ => EventResult::Ignored,
        }
    }

    /// Key pressed while the proxy input has focus.
    pub fn on_key_in_proxy(&mut self, event: KeyEvent) -> EventResult {
        if let Some(direction) = Direction::from_key(event.key) {
            self.move_cursor(direction);
            return EventResult::Consumed;
        }

        // Shortcuts belong to the host and never start an edit.
        if event.modifiers.is_command() {
            return EventResult::Ignored;
        }

        // Enter re-enters the cell: its text input takes focus, then its
        // checkbox flips.
        if event.key == Key::Enter {
            self.enter_cursor_text();
            self.toggle_cursor_checkbox();
            return EventResult::Consumed;
        }

        // Any other key starts editing the text input under the cursor; the
        // key itself falls through to that input and replaces the selection.
        self.enter_cursor_text();
        EventResult::Ignored
    }

    /// Move the cursor. Returns true if the position changed.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        let next = bounds.step(self.cursor, direction);
        if next == self.cursor {
            return false;
        }
        log::debug!("[grid] cursor {:?} -> {:?} ({:?})", self.cursor, next, direction);
        self.cursor = next;
        self.marked = Some(next);
        true
    }

    /// Default action of a key the grid ignored: edit the focused text input.
    /// A selected value is replaced by the first typed character. Returns
    /// true if the value changed.
    pub fn type_into_focused(&mut self, event: KeyEvent) -> bool {
        if event.modifiers.is_command() {
            return false;
        }
        let Some(id) = self.focus.focused_input().cloned() else {
            return false;
        };
        let replace = self.focus.is_selected();
        let Some(input) = self.input_mut(&id).filter(|i| i.kind.is_text() && !i.disabled) else {
            return false;
        };
        let changed = match event.key {
            Key::Char(c) => {
                if replace {
                    input.value.clear();
                }
                input.value.push(c);
                true
            }
            Key::Backspace | Key::Delete if replace => {
                input.value.clear();
                true
            }
            Key::Backspace => input.value.pop().is_some(),
            _ => false,
        };
        if changed {
            self.focus.clear_selection();
        }
        changed
    }

    fn move_and_leave_cell(&mut self, key: Key) -> EventResult {
        if let Some(direction) = Direction::from_key(key) {
            self.move_cursor(direction);
        }
        self.focus_proxy();
        EventResult::Consumed
    }

    fn enter_cursor_text(&mut self) {
        let text = self
            .table
            .cell(self.cursor.x, self.cursor.y)
            .and_then(|c| c.first_text_input())
            .map(|i| i.id.clone());
        if let Some(id) = text {
            log::debug!("[grid] proxy hands typing to {}", id);
            self.focus.focus_and_select(id);
        }
    }

    fn toggle_cursor_checkbox(&mut self) {
        let CellPos { x, y } = self.cursor;
        let Some(checkbox) = self.table.cell_mut(x, y).and_then(|c| c.first_checkbox_mut()) else {
            return;
        };
        if checkbox.disabled {
            return;
        }
        checkbox.checked = !checkbox.checked;
        log::debug!("[grid] toggled {} -> {}", checkbox.id, checkbox.checked);
    }
}
