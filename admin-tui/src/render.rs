//! Drawing with crossterm.
//!
//! Layout is in terminal cells. The edit box placement works in the editor's
//! pixel units, so positions are scaled by [`CELL_PX`] on the way in and out.

use std::io::{self, Write};
use std::sync::LazyLock;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use formgrid::{CellPos, Input, InputKind};
use regex::Regex;
use tableedit::editor::{EditSession, Phase};
use tableedit::form::Field;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Screen};

/// Pixels per terminal column.
pub(crate) const CELL_PX: i32 = 8;

const CHECK_WIDTH: i32 = 4;
const COLUMN_WIDTH: i32 = 16;
const LIST_TOP: i32 = 2;
const GRID_TOP: u16 = 2;
const GRID_FIRST_WIDTH: usize = 5;
const GRID_COLUMN_WIDTH: usize = 14;

static TD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td\s*>").expect("cell pattern"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern"));

static ERROR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li\s*>").expect("error pattern"));

/// Left edge of a list column, in terminal columns.
pub(crate) fn column_left(column: usize) -> i32 {
    CHECK_WIDTH + column as i32 * COLUMN_WIDTH
}

/// Screen line of a list row.
pub(crate) fn row_top(row: usize) -> i32 {
    LIST_TOP + row as i32
}

/// Short label of a changer icon: `positive fa-check-circle` shows as
/// `positive`.
pub(crate) fn icon_label(icon: Option<&str>) -> &str {
    icon.and_then(|i| i.split_whitespace().next()).unwrap_or("-")
}

/// Text of each `<td>` in a row's markup.
pub(crate) fn row_cells(markup: &str) -> Vec<String> {
    TD_RE
        .captures_iter(markup)
        .map(|caps| plain_text(&caps[1]))
        .collect()
}

fn plain_text(markup: &str) -> String {
    let text = TAG_RE.replace_all(markup, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Truncate or pad to exactly `width` terminal columns.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

pub fn draw(out: &mut impl Write, app: &App, size: (u16, u16)) -> io::Result<()> {
    let (width, height) = size;
    queue!(out, Clear(ClearType::All))?;

    draw_title(out, app)?;
    match app.screen {
        Screen::Formset => draw_formset(out, app)?,
        Screen::List => draw_list(out, app, width)?,
    }

    if let Some(status) = &app.status {
        put(
            out,
            0,
            height.saturating_sub(1),
            &fit(status, width as usize),
            &[Attribute::Bold],
            Some(Color::Yellow),
        )?;
    }

    out.flush()
}

fn draw_title(out: &mut impl Write, app: &App) -> io::Result<()> {
    let tab = |screen: Screen| {
        if app.screen == screen {
            vec![Attribute::Bold, Attribute::Reverse]
        } else {
            vec![Attribute::Dim]
        }
    };
    put(out, 0, 0, " Formset ", &tab(Screen::Formset), None)?;
    put(out, 10, 0, " List ", &tab(Screen::List), None)?;
    put(out, 18, 0, "F2 switch  Ctrl+Q quit", &[Attribute::Dim], None)
}

fn draw_formset(out: &mut impl Write, app: &App) -> io::Result<()> {
    let grid = &app.grid;
    let table = grid.table();
    let column_width = |x: usize| {
        if x == 0 {
            GRID_FIRST_WIDTH
        } else {
            GRID_COLUMN_WIDTH
        }
    };
    let column_x = |x: usize| -> u16 { (0..x).map(|i| column_width(i) as u16 + 1).sum() };

    for (x, header) in app.grid_headers.iter().enumerate() {
        put(out, column_x(x), 1, &fit(header, column_width(x)), &[Attribute::Underlined], None)?;
    }

    let focused = grid.focus().focused_input();
    for y in 0..table.row_count() {
        for x in 0..table.column_count() {
            let Some(cell) = table.cell(x, y) else { continue };
            let text: Vec<String> = cell.inputs.iter().filter_map(input_text).collect();
            let has_focus = focused.is_some_and(|id| cell.find(id).is_some());

            let mut attrs = Vec::new();
            if grid.marked() == Some(CellPos::new(x, y)) {
                attrs.push(Attribute::Reverse);
            }
            if has_focus {
                attrs.push(Attribute::Underlined);
            }
            let color = (has_focus && grid.focus().is_selected()).then_some(Color::Cyan);
            put(
                out,
                column_x(x),
                GRID_TOP + y as u16,
                &fit(&text.join(" "), column_width(x)),
                &attrs,
                color,
            )?;
        }
    }

    let hint = match grid.focus().focused_input() {
        Some(id) => format!("editing {id}  Enter/Esc leave cell  Tab next input"),
        None => "arrows/Tab move  Enter toggle  type to edit".to_string(),
    };
    let cursor = grid.cursor();
    put(
        out,
        0,
        GRID_TOP + table.row_count() as u16 + 1,
        &format!("({}, {})  {}", cursor.x, cursor.y, hint),
        &[Attribute::Dim],
        None,
    )
}

fn input_text(input: &Input) -> Option<String> {
    match input.kind {
        InputKind::Hidden => None,
        InputKind::Checkbox => Some(
            match (input.disabled, input.checked) {
                (true, _) => "[-]",
                (false, true) => "[x]",
                (false, false) => "[ ]",
            }
            .to_string(),
        ),
        _ => Some(input.value.clone()),
    }
}

fn draw_list(out: &mut impl Write, app: &App, width: u16) -> io::Result<()> {
    let table = app.editor.table();
    let status_x = column_left(table.columns().len()) as u16;

    for (i, header) in app.list_headers.iter().enumerate() {
        put(
            out,
            column_left(i) as u16,
            1,
            &fit(header, COLUMN_WIDTH as usize - 1),
            &[Attribute::Underlined],
            None,
        )?;
    }
    put(out, status_x, 1, "Status", &[Attribute::Underlined], None)?;

    for (i, row) in table.rows().iter().enumerate() {
        let y = row_top(i) as u16;
        let check = match &row.check {
            Some(c) if !c.enabled => "[-]",
            Some(c) if c.checked => "[x]",
            Some(_) => "[ ]",
            None => "   ",
        };
        let color = row.selected.then_some(Color::Green);
        let is_cursor_row = i == app.row;
        let row_attrs = if is_cursor_row { vec![Attribute::Bold] } else { Vec::new() };
        put(out, 0, y, check, &row_attrs, color)?;

        for (j, text) in row_cells(&row.markup).iter().enumerate() {
            let mut attrs = row_attrs.clone();
            if is_cursor_row && j == app.column {
                attrs.push(Attribute::Reverse);
            }
            put(
                out,
                column_left(j) as u16,
                y,
                &fit(text, COLUMN_WIDTH as usize - 1),
                &attrs,
                color,
            )?;
        }

        if let Some(changer) = app.changers.get(&row.id) {
            let label = if changer.is_loading() {
                "..."
            } else {
                icon_label(changer.icon())
            };
            put(out, status_x, y, label, &row_attrs, None)?;
        }
    }

    let hint_y = row_top(table.len()) as u16 + 1;
    put(
        out,
        0,
        hint_y,
        "arrows move  Space select  a all  Enter edit  s status",
        &[Attribute::Dim],
        None,
    )?;

    if let Some(session) = app.editor.session() {
        draw_box(out, app, session, width)?;
    }
    Ok(())
}

fn draw_box(out: &mut impl Write, app: &App, session: &EditSession, width: u16) -> io::Result<()> {
    let placement = session.placement();
    let box_width = (app.editor.config().box_width / CELL_PX).clamp(12, width.max(12) as i32) as usize;
    let left = (placement.left / CELL_PX).max(0) as u16;
    let mut y = placement.top.max(0) as u16 + 1;
    let inner = box_width - 2;

    let mut lines: Vec<(String, Vec<Attribute>, Option<Color>)> = Vec::new();
    match (session.phase(), session.content()) {
        (Phase::Loading, _) => lines.push(("Loading...".into(), Vec::new(), None)),
        (Phase::Failed, None) => {
            lines.push(("Request failed".into(), Vec::new(), Some(Color::Red)));
        }
        (_, Some(content)) => {
            for caps in ERROR_RE.captures_iter(content) {
                lines.push((plain_text(&caps[1]), Vec::new(), Some(Color::Red)));
            }
            for field in app.box_fields() {
                let focused = field.name.as_deref() == app.box_field.as_deref();
                let attrs = if focused { vec![Attribute::Reverse] } else { Vec::new() };
                let color = (focused && app.box_selected).then_some(Color::Cyan);
                lines.push((field_line(field), attrs, color));
            }
            let save = if session.is_submit_disabled() {
                (String::from("[ Saving ]"), vec![Attribute::Dim], None)
            } else {
                (String::from("[ Save ]"), vec![Attribute::Bold], None)
            };
            lines.push(save);
        }
        (_, None) => {}
    }

    let border = format!("+{}+", "-".repeat(inner));
    put(out, left, y, &border, &[], None)?;
    for (text, attrs, color) in lines {
        y += 1;
        put(out, left, y, "|", &[], None)?;
        put(out, left + 1, y, &fit(&text, inner), &attrs, color)?;
        put(out, left + 1 + inner as u16, y, "|", &[], None)?;
    }
    y += 1;
    put(out, left, y, &border, &[], None)?;
    put(out, left, y + 1, "Esc close  Tab field  Enter save", &[Attribute::Dim], None)
}

fn field_line(field: &Field) -> String {
    let name = field.name.as_deref().unwrap_or_default();
    if field.is_checkable() {
        let mark = if field.checked { "[x]" } else { "[ ]" };
        return format!("{mark} {name}");
    }
    format!("{name}: {}", field.values.join(", "))
}

fn put(
    out: &mut impl Write,
    x: u16,
    y: u16,
    text: &str,
    attrs: &[Attribute],
    color: Option<Color>,
) -> io::Result<()> {
    queue!(out, MoveTo(x, y))?;
    for attr in attrs {
        queue!(out, SetAttribute(*attr))?;
    }
    if let Some(color) = color {
        queue!(out, SetForegroundColor(color))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset))
}
