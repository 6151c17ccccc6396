//! The application: two screens over the two controllers, one event loop.

use std::collections::HashMap;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use formgrid::{GridNavigator, InputId, InputKind, Key};
use futures::StreamExt;
use tableedit::changer::{Changer, ChangerOutcome};
use tableedit::editor::{Completion, EditTarget, EditorEvent, EditorState};
use tableedit::form::{Field, FieldKind};
use tableedit::placement::CellOffset;
use tableedit::table::RowId;
use tableedit::{EditorConfig, RequestDriver, TableEditor, TransportError};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::AppError;
use crate::fixture::Pages;
use crate::render;
use crate::terminal::TerminalGuard;

/// Request completions delivered back to the event loop.
#[derive(Debug)]
pub enum Message {
    Editor(Completion),
    Changer {
        row: RowId,
        result: Result<String, TransportError>,
    },
}

impl From<Completion> for Message {
    fn from(completion: Completion) -> Self {
        Message::Editor(completion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Formset,
    List,
}

pub struct App {
    pub(crate) screen: Screen,
    pub(crate) grid: GridNavigator,
    pub(crate) grid_headers: Vec<String>,
    pub(crate) editor: TableEditor,
    pub(crate) list_headers: Vec<String>,
    pub(crate) changers: HashMap<RowId, Changer>,
    /// List cursor.
    pub(crate) row: usize,
    pub(crate) column: usize,
    /// Field of the edit box that takes typing.
    pub(crate) box_field: Option<String>,
    /// The box field's value is selected; the next keystroke replaces it.
    pub(crate) box_selected: bool,
    /// Changer waiting for a yes/no answer.
    pub(crate) confirm: Option<RowId>,
    pub(crate) status: Option<String>,
    pub(crate) width: u16,
    driver: RequestDriver<Message>,
    running: bool,
}

impl App {
    pub fn new(
        pages: Pages,
        config: EditorConfig,
        csrf_token: Option<String>,
        driver: RequestDriver<Message>,
        width: u16,
    ) -> Self {
        let Pages { formset, list } = pages;

        let mut grid = GridNavigator::new(formset.table);
        grid.focus_proxy();

        let mut editor = TableEditor::new(list.table, config);
        editor.set_csrf_token(csrf_token);

        Self {
            screen: Screen::Formset,
            grid,
            grid_headers: formset.headers,
            editor,
            list_headers: list.headers,
            changers: list.changers.into_iter().collect(),
            row: 0,
            column: 0,
            box_field: None,
            box_selected: false,
            confirm: None,
            status: None,
            width,
            driver,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Draw, then wait for a terminal event or a request completion.
    pub async fn run(
        &mut self,
        terminal: &mut TerminalGuard,
        mut completions: UnboundedReceiver<Message>,
    ) -> Result<(), AppError> {
        let mut events = EventStream::new();

        while self.is_running() {
            let size = terminal.size()?;
            render::draw(terminal.stdout(), self, size)?;

            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(message) = completions.recv() => self.on_message(message),
            }
        }

        log::info!("[app] exiting");
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, _) => self.width = width,
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            self.running = false;
            return;
        }
        if let Some(row) = self.confirm.take() {
            let answer = matches!(key.code, KeyCode::Char('y' | 'Y'));
            self.status = None;
            self.fire_changer(row, answer);
            return;
        }
        if key.code == KeyCode::F(2) {
            self.screen = match self.screen {
                Screen::Formset => Screen::List,
                Screen::List => Screen::Formset,
            };
            return;
        }

        match self.screen {
            Screen::Formset => self.formset_key(key),
            Screen::List => self.list_key(key),
        }
    }

    pub fn on_message(&mut self, message: Message) {
        match message {
            Message::Editor(completion) => {
                self.editor.complete(completion);
                self.apply_editor_events();
            }
            Message::Changer { row, result } => {
                let Some(changer) = self.changers.get_mut(&row) else {
                    return;
                };
                match changer.complete(result) {
                    ChangerOutcome::Unchanged => {}
                    ChangerOutcome::Switched(_) => {
                        self.status = Some(format!(
                            "Row {}: {}",
                            row,
                            render::icon_label(changer.icon())
                        ));
                    }
                    ChangerOutcome::Rejected(message) | ChangerOutcome::Failed(message) => {
                        self.status = Some(message);
                    }
                }
            }
        }
    }

    // Formset screen

    fn formset_key(&mut self, key: KeyEvent) {
        let Some(event) = formgrid::KeyEvent::from_crossterm(&key) else {
            return;
        };
        if self.grid.on_key(event).is_consumed() {
            return;
        }
        if self.grid.focus().focused().is_none() {
            self.grid.focus_proxy();
            return;
        }
        match event.key {
            Key::Tab => self.focus_next_input(false),
            Key::BackTab => self.focus_next_input(true),
            _ => {
                self.grid.type_into_focused(event);
            }
        }
    }

    /// Tab inside a cell: focus moves through the inputs in document order and
    /// the cursor follows.
    fn focus_next_input(&mut self, back: bool) {
        let ids: Vec<InputId> = self
            .grid
            .table()
            .inputs()
            .filter(|i| !i.disabled && i.kind != InputKind::Hidden)
            .map(|i| i.id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .grid
            .focus()
            .focused_input()
            .and_then(|id| ids.iter().position(|i| i == id));
        let next = match (current, back) {
            (Some(i), false) => (i + 1) % ids.len(),
            (Some(i), true) => (i + ids.len() - 1) % ids.len(),
            (None, _) => 0,
        };
        self.grid.on_cell_focus(&ids[next]);
    }

    // List screen

    fn list_key(&mut self, key: KeyEvent) {
        if self.editor.state() == EditorState::Open {
            self.box_key(key);
            return;
        }

        let rows = self.editor.table().len();
        let columns = self.editor.table().columns().len();
        match key.code {
            KeyCode::Esc => {
                self.editor.close();
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => self.row = (self.row + 1).min(rows.saturating_sub(1)),
            KeyCode::Left => self.column = self.column.saturating_sub(1),
            KeyCode::Right => self.column = (self.column + 1).min(columns.saturating_sub(1)),
            KeyCode::Char(' ') => self.toggle_row(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Enter | KeyCode::Char('e') => self.open_editor(),
            KeyCode::Char('s') => self.activate_changer(),
            _ => {}
        }
        self.apply_editor_events();
    }

    fn current_row_id(&self) -> Option<RowId> {
        self.editor.table().rows().get(self.row).map(|r| r.id.clone())
    }

    fn toggle_row(&mut self) {
        let Some(row) = self.editor.table().rows().get(self.row) else {
            return;
        };
        let id = row.id.clone();
        let checked = row.check.as_ref().is_some_and(|c| c.checked);
        if !self.editor.table_mut().set_row_checked(&id, !checked) {
            self.status = Some(format!("Row {id} cannot be selected"));
        }
    }

    fn toggle_all(&mut self) {
        let checked = !self.editor.table().all_selected();
        self.editor.table_mut().toggle_all(checked);
        let mut ids = String::new();
        self.editor.table().set_checked(&mut ids);
        self.status = Some(if ids.is_empty() {
            "No rows selected".to_string()
        } else {
            format!("Selected: {ids}")
        });
    }

    fn open_editor(&mut self) {
        let table = self.editor.table();
        let (Some(row), Some(column)) = (table.rows().get(self.row), table.columns().get(self.column))
        else {
            return;
        };
        let target = EditTarget {
            row: row.id.clone(),
            column: column.id.clone(),
        };
        let cell = CellOffset::new(
            render::column_left(self.column) * render::CELL_PX,
            render::row_top(self.row),
        );
        let document_width = i32::from(self.width) * render::CELL_PX;

        let column_id = target.column.clone();
        match self.editor.edit(target, cell, document_width) {
            Some(pending) => self.driver.dispatch_edit(pending),
            None => self.status = Some(format!("Column {column_id} is not editable")),
        }
    }

    fn activate_changer(&mut self) {
        let Some(id) = self.current_row_id() else {
            return;
        };
        let Some(changer) = self.changers.get(&id) else {
            return;
        };
        match changer.confirm_title() {
            Some(title) if !changer.is_loading() => {
                self.status = Some(format!("{title} (y/n)"));
                self.confirm = Some(id);
            }
            _ => self.fire_changer(id, true),
        }
    }

    fn fire_changer(&mut self, row: RowId, confirmed: bool) {
        let Some(changer) = self.changers.get_mut(&row) else {
            return;
        };
        let Some(request) = changer.activate(|_| confirmed) else {
            return;
        };
        self.driver
            .dispatch(request, move |result| Message::Changer { row, result });
    }

    // Edit box

    fn box_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editor.close();
            }
            KeyCode::Enter => {
                if let Some(pending) = self.editor.submit() {
                    self.driver.dispatch_edit(pending);
                }
            }
            KeyCode::Tab | KeyCode::Down => self.cycle_box_field(false),
            KeyCode::BackTab | KeyCode::Up => self.cycle_box_field(true),
            _ if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            code => self.edit_box_field(code),
        }
        self.apply_editor_events();
    }

    /// Named fields of the open form the user can type into.
    pub(crate) fn box_fields(&self) -> Vec<&Field> {
        let Some(form) = self.editor.session().and_then(|s| s.form()) else {
            return Vec::new();
        };
        let mut fields: Vec<&Field> = form
            .fields()
            .iter()
            .filter(|f| f.name.is_some() && f.is_focusable() && !is_button(f))
            .collect();
        // Radio groups are one stop.
        fields.dedup_by(|a, b| a.name == b.name);
        fields
    }

    fn cycle_box_field(&mut self, back: bool) {
        let names: Vec<String> = self
            .box_fields()
            .iter()
            .filter_map(|f| f.name.clone())
            .collect();
        if names.is_empty() {
            return;
        }
        let current = self
            .box_field
            .as_ref()
            .and_then(|name| names.iter().position(|n| n == name));
        let next = match (current, back) {
            (Some(i), false) => (i + 1) % names.len(),
            (Some(i), true) => (i + names.len() - 1) % names.len(),
            (None, _) => 0,
        };
        self.box_field = Some(names[next].clone());
        self.box_selected = true;
    }

    fn edit_box_field(&mut self, code: KeyCode) {
        let Some(name) = self.box_field.clone() else {
            return;
        };
        let Some(field) = self
            .editor
            .session()
            .and_then(|s| s.form())
            .and_then(|f| f.field(&name))
            .cloned()
        else {
            return;
        };

        if field.is_checkable() {
            if code == KeyCode::Char(' ') {
                if field.kind == FieldKind::Input("radio".into()) {
                    self.editor.set_checked(&name, field.value(), true);
                } else {
                    self.editor.set_checked(&name, None, !field.checked);
                }
            }
            return;
        }

        if let FieldKind::Select { .. } = field.kind {
            let current = field
                .value()
                .and_then(|v| field.options.iter().position(|o| o == v));
            let next = match (code, current) {
                (KeyCode::Left, Some(i)) => i.saturating_sub(1),
                (KeyCode::Right, Some(i)) => (i + 1).min(field.options.len().saturating_sub(1)),
                (KeyCode::Left | KeyCode::Right, None) => 0,
                _ => return,
            };
            if let Some(option) = field.options.get(next) {
                self.editor.set_field(&name, option.clone());
            }
            return;
        }

        let mut value = if self.box_selected {
            String::new()
        } else {
            field.value().unwrap_or_default().to_string()
        };
        match code {
            KeyCode::Char(c) if !c.is_control() => value.push(c),
            KeyCode::Backspace | KeyCode::Delete if self.box_selected => {}
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return,
        }
        self.box_selected = false;
        self.editor.set_field(&name, value);
    }

    fn apply_editor_events(&mut self) {
        let events: Vec<EditorEvent> = self.editor.drain_events().collect();
        for event in events {
            match event {
                EditorEvent::BoxOpened { token, target, .. } => {
                    log::debug!("[app] box {} for row {}", token, target.row);
                    self.status = Some("Loading...".to_string());
                }
                EditorEvent::ContentReplaced { .. } => {
                    self.box_field = None;
                    self.box_selected = false;
                    self.status = None;
                }
                EditorEvent::FocusField { name, .. } => {
                    self.box_field = Some(name);
                    self.box_selected = true;
                }
                EditorEvent::InitAutocomplete => {
                    log::debug!("[app] edit box carries autocomplete fields");
                }
                EditorEvent::SubmitDisabled { .. } => self.status = Some("Saving...".to_string()),
                EditorEvent::RowReplaced { row } => self.status = Some(format!("Row {row} saved")),
                EditorEvent::BoxClosed { .. } => self.box_field = None,
                EditorEvent::Alert { message } => self.status = Some(message),
            }
        }
    }
}

fn is_button(field: &Field) -> bool {
    matches!(
        &field.kind,
        FieldKind::Input(t) if matches!(t.as_str(), "submit" | "button" | "reset" | "image")
    )
}
