//! In-document structure of a formset table: rows of cells holding inputs.
//!
//! This is the host-provided markup, reduced to what navigation needs. The
//! grid never adds or removes rows; it only reads structure and flips input
//! state (focus, checked, type normalisation).

use std::fmt;

/// Identity of a single input element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(String);

impl InputId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of form control inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Number,
    Checkbox,
    Select,
    Textarea,
    Hidden,
}

impl InputKind {
    /// Plain text inputs, the only kind that takes over typing from the proxy.
    pub fn is_text(&self) -> bool {
        matches!(self, InputKind::Text)
    }
}

/// A form control inside a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub id: InputId,
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    /// Browser-level `autocomplete` attribute.
    pub browser_autocomplete: bool,
    /// A suggestion dropdown is attached to this field and owns Up/Down.
    pub autocomplete_widget: bool,
}

impl Input {
    pub fn new(id: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: InputId::new(id),
            kind,
            value: String::new(),
            checked: false,
            disabled: false,
            browser_autocomplete: true,
            autocomplete_widget: false,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, InputKind::Text)
    }

    pub fn number(id: impl Into<String>) -> Self {
        Self::new(id, InputKind::Number)
    }

    pub fn checkbox(id: impl Into<String>) -> Self {
        Self::new(id, InputKind::Checkbox)
    }

    pub fn select(id: impl Into<String>) -> Self {
        Self::new(id, InputKind::Select)
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_autocomplete_widget(mut self) -> Self {
        self.autocomplete_widget = true;
        self
    }

    /// Prepare the input for grid editing: no browser suggestions, and numeric
    /// inputs become text inputs so arrow keys don't spin their value.
    pub fn normalize(&mut self) {
        self.browser_autocomplete = false;
        if self.kind == InputKind::Number {
            self.kind = InputKind::Text;
        }
    }
}

/// A table cell. Column 0 of every row conventionally holds the row checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub inputs: Vec<Input>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(input: Input) -> Self {
        Self {
            inputs: vec![input],
        }
    }

    pub fn input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn find(&self, id: &InputId) -> Option<&Input> {
        self.inputs.iter().find(|i| &i.id == id)
    }

    pub fn find_mut(&mut self, id: &InputId) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|i| &i.id == id)
    }

    pub fn first_text_input(&self) -> Option<&Input> {
        self.inputs.iter().find(|i| i.kind.is_text())
    }

    pub fn first_checkbox_mut(&mut self) -> Option<&mut Input> {
        self.inputs
            .iter_mut()
            .find(|i| i.kind == InputKind::Checkbox)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// The body of a formset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count as seen by the first row.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.rows.get(y).and_then(|r| r.cells.get(x))
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        self.rows.get_mut(y).and_then(|r| r.cells.get_mut(x))
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Input> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.inputs.iter())
    }

    pub fn normalize_inputs(&mut self) {
        for input in self
            .rows
            .iter_mut()
            .flat_map(|r| r.cells.iter_mut())
            .flat_map(|c| c.inputs.iter_mut())
        {
            input.normalize();
        }
    }
}
