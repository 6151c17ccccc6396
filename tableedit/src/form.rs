//! Edit form extracted from server-rendered box markup.
//!
//! Only the form controls matter to the editor: which field gets focus, whether
//! an autocomplete widget needs setting up, and what a submit sends. Controls
//! are scanned in document order.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::protocol::FormData;

/// Class marking a field that carries an autocomplete widget.
pub const AUTOCOMPLETE_CLASS: &str = "ui-autocomplete-input";

static CONTROL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<input\b(?P<input>[^>]*)>|<textarea\b(?P<textarea>[^>]*)>(?P<text>.*?)</textarea\s*>|<select\b(?P<select>[^>]*)>(?P<options>.*?)</select\s*>",
    )
    .expect("control pattern")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern")
});

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<option\b([^>]*)>([^<]*)").expect("option pattern"));

/// Kind of form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` with its (lowercased) `type`, `text` when absent.
    Input(String),
    Textarea,
    Select { multiple: bool },
}

/// A single form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub kind: FieldKind,
    /// Current value(s). Selects hold every selected option.
    pub values: Vec<String>,
    /// Checked state for checkboxes and radios.
    pub checked: bool,
    pub disabled: bool,
    pub classes: Vec<String>,
    /// Options of a select, in order.
    pub options: Vec<String>,
}

impl Field {
    fn input_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Input(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self.input_type(), Some("checkbox" | "radio"))
    }

    pub fn is_hidden(&self) -> bool {
        self.input_type() == Some("hidden")
    }

    /// Buttons and file pickers are never part of a submit payload.
    fn is_successful_kind(&self) -> bool {
        !matches!(
            self.input_type(),
            Some("submit" | "button" | "reset" | "image" | "file")
        )
    }

    /// Whether the user can put the cursor in this field.
    pub fn is_focusable(&self) -> bool {
        !self.disabled && !self.is_hidden()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// The form inside an edit box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    fields: Vec<Field>,
}

impl EditForm {
    /// Scans markup for input, select and textarea controls.
    pub fn parse(markup: &str) -> Self {
        let fields = CONTROL_RE
            .captures_iter(markup)
            .filter_map(|caps| {
                if let Some(attrs) = caps.name("input") {
                    Some(input_field(&parse_attrs(attrs.as_str())))
                } else if let Some(attrs) = caps.name("textarea") {
                    let text = caps.name("text").map(|m| m.as_str()).unwrap_or_default();
                    Some(textarea_field(&parse_attrs(attrs.as_str()), text))
                } else {
                    let attrs = caps.name("select")?;
                    let options = caps.name("options").map(|m| m.as_str()).unwrap_or_default();
                    Some(select_field(&parse_attrs(attrs.as_str()), options))
                }
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.as_deref() == Some(name))
    }

    /// First field the cursor can enter; it receives focus when the box opens.
    pub fn first_focusable(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_focusable())
    }

    /// Whether any field carries an autocomplete widget.
    pub fn has_autocomplete(&self) -> bool {
        self.fields.iter().any(|f| f.has_class(AUTOCOMPLETE_CLASS))
    }

    /// Set the value of a text-like field, textarea or select. Returns false if
    /// no such enabled field exists.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(field) = self.field_mut(name) else {
            return false;
        };
        if field.is_checkable() {
            return false;
        }
        field.values = vec![value.into()];
        true
    }

    /// Check or uncheck a checkbox, or pick the radio whose value matches.
    pub fn set_checked(&mut self, name: &str, value: Option<&str>, checked: bool) -> bool {
        let mut changed = false;
        for field in self
            .fields
            .iter_mut()
            .filter(|f| f.name.as_deref() == Some(name) && f.is_checkable() && !f.disabled)
        {
            let matches = value.is_none_or(|v| field.value() == Some(v));
            if field.input_type() == Some("radio") {
                field.checked = matches && checked;
                changed |= matches;
            } else if matches {
                field.checked = checked;
                changed = true;
            }
        }
        changed
    }

    /// Successful controls as name/value pairs, in document order: named,
    /// enabled, not a button, and checked if checkable.
    pub fn serialize(&self) -> FormData {
        let mut data = FormData::new();
        for field in &self.fields {
            let Some(name) = &field.name else { continue };
            if field.disabled || !field.is_successful_kind() {
                continue;
            }
            if field.is_checkable() && !field.checked {
                continue;
            }
            for value in &field.values {
                data.push(name.clone(), value.replace("\r\n", "\n").replace('\n', "\r\n"));
            }
        }
        data
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.name.as_deref() == Some(name) && !f.disabled)
    }
}

fn parse_attrs(raw: &str) -> HashMap<String, Option<String>> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| unescape(m.as_str()));
            Some((name, value))
        })
        .collect()
}

fn attr<'a>(attrs: &'a HashMap<String, Option<String>>, name: &str) -> Option<&'a str> {
    attrs.get(name).and_then(|v| v.as_deref())
}

fn classes(attrs: &HashMap<String, Option<String>>) -> Vec<String> {
    attr(attrs, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn input_field(attrs: &HashMap<String, Option<String>>) -> Field {
    let input_type = attr(attrs, "type")
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "text".to_string());
    let checkable = matches!(input_type.as_str(), "checkbox" | "radio");
    let value = match attr(attrs, "value") {
        Some(v) => v.to_string(),
        None if checkable => "on".to_string(),
        None => String::new(),
    };
    Field {
        name: attr(attrs, "name").map(str::to_string),
        kind: FieldKind::Input(input_type),
        values: vec![value],
        checked: attrs.contains_key("checked"),
        disabled: attrs.contains_key("disabled"),
        classes: classes(attrs),
        options: Vec::new(),
    }
}

fn textarea_field(attrs: &HashMap<String, Option<String>>, text: &str) -> Field {
    // A single leading newline after the opening tag is not content.
    let text = text
        .strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text);
    Field {
        name: attr(attrs, "name").map(str::to_string),
        kind: FieldKind::Textarea,
        values: vec![unescape(text)],
        checked: false,
        disabled: attrs.contains_key("disabled"),
        classes: classes(attrs),
        options: Vec::new(),
    }
}

fn select_field(attrs: &HashMap<String, Option<String>>, body: &str) -> Field {
    let multiple = attrs.contains_key("multiple");
    let mut options = Vec::new();
    let mut selected = Vec::new();
    for caps in OPTION_RE.captures_iter(body) {
        let option_attrs = parse_attrs(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
        if option_attrs.contains_key("disabled") {
            continue;
        }
        let value = match attr(&option_attrs, "value") {
            Some(v) => v.to_string(),
            None => unescape(caps.get(2).map(|m| m.as_str()).unwrap_or_default().trim()),
        };
        if option_attrs.contains_key("selected") {
            selected.push(value.clone());
        }
        options.push(value);
    }
    if !multiple {
        // Without an explicit choice a single select submits its first option;
        // with several, the last one wins.
        selected = match selected.pop() {
            Some(last) => vec![last],
            None => options.first().cloned().into_iter().collect(),
        };
    }
    Field {
        name: attr(attrs, "name").map(str::to_string),
        kind: FieldKind::Select { multiple },
        values: selected,
        checked: false,
        disabled: attrs.contains_key("disabled"),
        classes: classes(attrs),
        options,
    }
}

fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <form method="post">
          <input type="hidden" name="csrfmiddlewaretoken" value="tok">
          <input type="hidden" name="_action" value="edit">
          <input type="hidden" name="_column" value="price">
          <input type="hidden" name="id" value="42">
          <input type="hidden" name="_save" value="1">
          <input type="text" name="price" value="10.50" class="form-control">
          <input type="checkbox" name="in_stock" checked>
          <input type="checkbox" name="archived" value="yes">
          <select name="currency"><option value="EUR">Euro</option><option value="USD" selected>Dollar</option></select>
          <textarea name="note">
Tom &amp; Jerry</textarea>
          <input type="text" name="locked" value="x" disabled>
          <button type="submit" class="btn-submit">Save</button>
          <input type="submit" name="go" value="Go">
        </form>"#;

    #[test]
    fn test_parse_fields_in_order() {
        let form = EditForm::parse(FORM);
        let names: Vec<_> = form.fields().iter().filter_map(|f| f.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                "csrfmiddlewaretoken",
                "_action",
                "_column",
                "id",
                "_save",
                "price",
                "in_stock",
                "archived",
                "currency",
                "note",
                "locked",
                "go"
            ]
        );
        assert_eq!(form.field("note").and_then(|f| f.value()), Some("Tom & Jerry"));
        assert_eq!(form.field("currency").map(|f| f.options.len()), Some(2));
    }

    #[test]
    fn test_first_focusable_skips_hidden() {
        let form = EditForm::parse(FORM);
        assert_eq!(
            form.first_focusable().and_then(|f| f.name.as_deref()),
            Some("price")
        );
        assert!(!form.has_autocomplete());
    }

    #[test]
    fn test_serialize_successful_controls() {
        let form = EditForm::parse(FORM);
        let data = form.serialize();
        let pairs: Vec<_> = data
            .pairs()
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("csrfmiddlewaretoken", "tok"),
                ("_action", "edit"),
                ("_column", "price"),
                ("id", "42"),
                ("_save", "1"),
                ("price", "10.50"),
                ("in_stock", "on"),
                ("currency", "USD"),
                ("note", "Tom & Jerry"),
            ]
        );
    }

    #[test]
    fn test_edit_values_before_serialize() {
        let mut form = EditForm::parse(FORM);
        assert!(form.set_value("price", "11"));
        assert!(form.set_checked("archived", None, true));
        assert!(form.set_checked("in_stock", None, false));
        assert!(!form.set_value("locked", "y"));
        assert!(!form.set_value("missing", "y"));

        let data = form.serialize();
        assert_eq!(data.get("price"), Some("11"));
        assert_eq!(data.get("archived"), Some("yes"));
        assert_eq!(data.get("in_stock"), None);
    }

    #[test]
    fn test_select_defaults_to_first_option() {
        let form = EditForm::parse(
            r#"<select name="size"><option>S</option><option>M</option></select>
               <select name="tags" multiple><option value="a" selected>A</option><option value="b" selected>B</option></select>"#,
        );
        assert_eq!(form.field("size").map(|f| f.values.clone()), Some(vec!["S".to_string()]));
        let data = form.serialize();
        let tags: Vec<_> = data.pairs().iter().filter(|(n, _)| n == "tags").collect();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_detects_autocomplete_field() {
        let form = EditForm::parse(
            r#"<input type="text" name="city" class="vTextField ui-autocomplete-input" autocomplete="off">"#,
        );
        assert!(form.has_autocomplete());
    }

    #[test]
    fn test_radio_group() {
        let mut form = EditForm::parse(
            r#"<input type="radio" name="state" value="draft" checked>
               <input type="radio" name="state" value="live">"#,
        );
        assert!(form.set_checked("state", Some("live"), true));
        assert_eq!(form.serialize().get("state"), Some("live"));
    }
}
