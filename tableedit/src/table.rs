//! Rows and columns of a server-rendered list table.

use std::fmt;

/// Identifier of a table row (the object's primary key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a table column (the field name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    /// Cells of this column open the inline editor when clicked.
    pub editable: bool,
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(id),
            editable: false,
        }
    }

    pub fn editable(id: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(id),
            editable: true,
        }
    }
}

/// The selection checkbox of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCheck {
    /// Submitted value, usually the row id.
    pub value: String,
    pub checked: bool,
    pub enabled: bool,
}

impl RowCheck {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: RowId,
    /// Server-rendered markup of the row.
    pub markup: String,
    pub check: Option<RowCheck>,
    /// Whether the row shows as selected.
    pub selected: bool,
}

impl TableRow {
    pub fn new(id: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            id: RowId::new(id),
            markup: markup.into(),
            check: None,
            selected: false,
        }
    }

    pub fn with_check(mut self, check: RowCheck) -> Self {
        self.selected = check.checked;
        self.check = Some(check);
        self
    }
}

/// A list table: columns plus the rows currently in the document.
#[derive(Debug, Clone, Default)]
pub struct ListTable {
    columns: Vec<Column>,
    pub(crate) rows: Vec<TableRow>,
}

impl ListTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<Column>, rows: Vec<TableRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    pub fn row(&self, id: &RowId) -> Option<&TableRow> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn row_mut(&mut self, id: &RowId) -> Option<&mut TableRow> {
        self.rows.iter_mut().find(|r| &r.id == id)
    }

    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == id)
    }

    /// Whether clicking this cell opens the inline editor.
    pub fn is_editable(&self, row: &RowId, column: &ColumnId) -> bool {
        self.row(row).is_some() && self.column(column).is_some_and(|c| c.editable)
    }

    /// Swap a row's markup for a fresh server rendering, in place.
    ///
    /// The new rendering starts unselected; the checkbox keeps its value and
    /// enabled state. Returns false if the row is gone.
    pub fn replace_row(&mut self, id: &RowId, markup: impl Into<String>) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        row.markup = markup.into();
        row.selected = false;
        if let Some(check) = row.check.as_mut() {
            check.checked = false;
        }
        true
    }
}
