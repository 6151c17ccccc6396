//! Table fixtures: the formset grid and the list table shown by the app.
//!
//! The list rows are turned into the same `<tr>` markup the server sends back
//! after a successful edit, so replaced rows and fixture rows render alike.

use std::fs;
use std::path::Path;

use formgrid::{Cell, Input, InputKind, Row, Table};
use serde::Deserialize;
use tableedit::changer::Changer;
use tableedit::table::{Column, ListTable, RowCheck, RowId, TableRow};

use crate::error::AppError;

const BUILT_IN: &str = include_str!("../fixtures/default.json");

/// Everything the two screens start from.
#[derive(Debug)]
pub struct Pages {
    pub formset: FormsetPage,
    pub list: ListPage,
}

#[derive(Debug)]
pub struct FormsetPage {
    pub headers: Vec<String>,
    pub table: Table,
}

#[derive(Debug)]
pub struct ListPage {
    pub headers: Vec<String>,
    pub table: ListTable,
    pub changers: Vec<(RowId, Changer)>,
}

#[derive(Debug, Deserialize)]
struct FixtureDoc {
    formset: FormsetDoc,
    list: ListDoc,
}

#[derive(Debug, Deserialize)]
struct FormsetDoc {
    #[serde(default)]
    headers: Vec<String>,
    rows: Vec<Vec<Vec<InputDoc>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDoc {
    Text,
    Number,
    Checkbox,
    Select,
    Textarea,
    Hidden,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    kind: KindDoc,
    #[serde(default)]
    value: String,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    autocomplete: bool,
}

#[derive(Debug, Deserialize)]
struct ListDoc {
    columns: Vec<ColumnDoc>,
    rows: Vec<RowDoc>,
}

#[derive(Debug, Deserialize)]
struct ColumnDoc {
    id: String,
    label: Option<String>,
    #[serde(default)]
    editable: bool,
}

#[derive(Debug, Deserialize)]
struct RowDoc {
    id: String,
    cells: Vec<String>,
    #[serde(default)]
    check: CheckDoc,
    changer: Option<ChangerDoc>,
}

#[derive(Debug, Default, Deserialize)]
struct CheckDoc {
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct ChangerDoc {
    url: String,
    value: Option<usize>,
    icons: Option<String>,
    confirm: Option<String>,
}

impl Pages {
    /// The fixture bundled with the binary.
    pub fn built_in() -> Result<Self, AppError> {
        Self::from_json(BUILT_IN)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let doc: FixtureDoc = serde_json::from_str(json).map_err(AppError::Fixture)?;
        Ok(Self {
            formset: formset_page(doc.formset),
            list: list_page(doc.list),
        })
    }
}

fn formset_page(doc: FormsetDoc) -> FormsetPage {
    let rows = doc
        .rows
        .into_iter()
        .map(|cells| {
            Row::new(
                cells
                    .into_iter()
                    .map(|inputs| Cell {
                        inputs: inputs.into_iter().map(input).collect(),
                    })
                    .collect(),
            )
        })
        .collect();
    FormsetPage {
        headers: doc.headers,
        table: Table::new(rows),
    }
}

fn input(doc: InputDoc) -> Input {
    let kind = match doc.kind {
        KindDoc::Text => InputKind::Text,
        KindDoc::Number => InputKind::Number,
        KindDoc::Checkbox => InputKind::Checkbox,
        KindDoc::Select => InputKind::Select,
        KindDoc::Textarea => InputKind::Textarea,
        KindDoc::Hidden => InputKind::Hidden,
    };
    let input = Input::new(doc.id, kind)
        .value(doc.value)
        .checked(doc.checked)
        .disabled(doc.disabled);
    if doc.autocomplete {
        input.with_autocomplete_widget()
    } else {
        input
    }
}

fn list_page(doc: ListDoc) -> ListPage {
    let headers = doc
        .columns
        .iter()
        .map(|c| c.label.clone().unwrap_or_else(|| c.id.clone()))
        .collect();
    let columns = doc
        .columns
        .into_iter()
        .map(|c| {
            if c.editable {
                Column::editable(c.id)
            } else {
                Column::new(c.id)
            }
        })
        .collect();

    let mut changers = Vec::new();
    let rows = doc
        .rows
        .into_iter()
        .map(|row| {
            if let Some(changer) = row.changer {
                changers.push((RowId::new(row.id.clone()), build_changer(changer)));
            }
            let mut check = RowCheck::new(row.id.clone()).checked(row.check.checked);
            if row.check.disabled {
                check = check.disabled();
            }
            TableRow::new(row.id, row_markup(&row.cells)).with_check(check)
        })
        .collect();

    ListPage {
        headers,
        table: ListTable::with_rows(columns, rows),
        changers,
    }
}

fn build_changer(doc: ChangerDoc) -> Changer {
    let mut changer = Changer::new(doc.url);
    if let Some(icons) = &doc.icons {
        changer = changer.with_icons(icons);
    }
    if let Some(title) = doc.confirm {
        changer = changer.with_confirm(title);
    }
    if let Some(value) = doc.value {
        changer = changer.with_value(value);
    }
    changer
}

fn row_markup(cells: &[String]) -> String {
    let mut markup = String::from("<tr>");
    for cell in cells {
        markup.push_str("<td>");
        markup.push_str(&escape(cell));
        markup.push_str("</td>");
    }
    markup.push_str("</tr>");
    markup
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
