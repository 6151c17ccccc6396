use tableedit::editor::{EditTarget, EditorEvent, EditorState, PendingRequest, RequestKind};
use tableedit::placement::CellOffset;
use tableedit::table::{Column, ListTable, RowCheck, TableRow};
use tableedit::{EditorConfig, TableEditor, TransportError};

const FORM: &str = r#"<form>
<input type="hidden" name="csrfmiddlewaretoken" value="tok">
<input type="text" name="price" value="9.50">
<button type="submit">Save</button>
</form>"#;

fn editor() -> TableEditor {
    let table = ListTable::with_rows(
        vec![Column::new("name"), Column::editable("price")],
        vec![
            TableRow::new("1", "<tr><td>apple</td><td>1.00</td></tr>")
                .with_check(RowCheck::new("1")),
            TableRow::new("2", "<tr><td>pear</td><td>2.00</td></tr>")
                .with_check(RowCheck::new("2")),
        ],
    );
    TableEditor::new(table, EditorConfig::default()).with_csrf_token("tok")
}

fn open(editor: &mut TableEditor, row: &str) -> PendingRequest {
    editor
        .edit(EditTarget::new(row, "price"), CellOffset::new(100, 40), 1200)
        .expect("editable cell")
}

fn ok(success: bool, content: &str) -> Result<String, TransportError> {
    Ok(serde_json::json!({ "success": success, "content": content }).to_string())
}

fn loaded(editor: &mut TableEditor, row: &str) {
    let load = open(editor, row);
    assert!(editor.complete(load.complete(ok(true, FORM))));
    assert_eq!(editor.state(), EditorState::Open);
}

#[test]
fn test_load_success_opens_form_and_focuses_first_field() {
    let mut editor = editor();
    let load = open(&mut editor, "1");
    let token = load.token();
    editor.drain_events().for_each(drop);

    assert!(editor.complete(load.complete(ok(true, FORM))));

    let session = editor.session().unwrap();
    assert_eq!(session.content(), Some(FORM));
    assert_eq!(session.focused_field(), Some("price"));
    assert!(!session.is_submit_disabled());

    let events: Vec<_> = editor.drain_events().collect();
    assert_eq!(
        events,
        vec![
            EditorEvent::ContentReplaced { token },
            EditorEvent::FocusField {
                token,
                name: "price".into()
            },
        ]
    );
}

#[test]
fn test_autocomplete_form_broadcasts_init() {
    let mut editor = editor();
    let load = open(&mut editor, "1");
    let markup = r#"<input name="supplier" class="ui-autocomplete-input">"#;
    editor.complete(load.complete(ok(true, markup)));
    assert!(
        editor
            .drain_events()
            .any(|e| e == EditorEvent::InitAutocomplete)
    );
}

#[test]
fn test_reopening_leaves_exactly_the_new_box() {
    let mut editor = editor();
    loaded(&mut editor, "1");
    let old_token = editor.session().unwrap().token();

    let load = open(&mut editor, "2");
    let session = editor.session().unwrap();
    assert_ne!(session.token(), old_token);
    assert_eq!(session.target().row.as_str(), "2");
    assert_eq!(session.content(), None);
    assert_eq!(editor.state(), EditorState::Loading);

    editor.complete(load.complete(ok(true, "<input name=\"price\" value=\"2.00\">")));
    assert_eq!(
        editor.session().unwrap().content(),
        Some("<input name=\"price\" value=\"2.00\">")
    );
}

#[test]
fn test_reopening_while_submitting_discards_the_submit() {
    let mut editor = editor();
    loaded(&mut editor, "1");
    let submit = editor.submit().unwrap();

    let load = open(&mut editor, "2");
    assert!(!editor.complete(submit.complete(ok(true, "<tr>saved</tr>"))));
    assert_eq!(
        editor.table().rows()[0].markup,
        "<tr><td>apple</td><td>1.00</td></tr>"
    );

    assert!(editor.complete(load.complete(ok(true, FORM))));
    assert_eq!(editor.session().unwrap().target().row.as_str(), "2");
}

#[test]
fn test_stale_load_never_lands_in_newer_box() {
    let mut editor = editor();
    let first = open(&mut editor, "1");
    let second = open(&mut editor, "2");

    assert!(!editor.complete(first.complete(ok(true, "<p>first</p>"))));
    assert_eq!(editor.session().unwrap().content(), None);

    assert!(editor.complete(second.complete(ok(true, "<p>second</p>"))));
    assert_eq!(editor.session().unwrap().content(), Some("<p>second</p>"));
}

#[test]
fn test_completion_after_close_is_dropped() {
    let mut editor = editor();
    let load = open(&mut editor, "1");
    editor.close();
    assert!(!editor.complete(load.complete(ok(true, FORM))));
    assert_eq!(editor.state(), EditorState::Closed);
}

#[test]
fn test_declined_load_changes_nothing() {
    let mut editor = editor();
    let before = editor.table().rows().to_vec();
    let load = open(&mut editor, "1");
    editor.drain_events().for_each(drop);

    assert!(!editor.complete(load.complete(ok(false, "<p>nope</p>"))));
    assert_eq!(editor.state(), EditorState::Loading);
    assert_eq!(editor.drain_events().count(), 0);
    assert_eq!(editor.table().rows(), before.as_slice());
}

#[test]
fn test_load_failure_alerts_and_leaves_rows_alone() {
    let mut editor = editor();
    let before = editor.table().rows().to_vec();
    let load = open(&mut editor, "1");
    editor.drain_events().for_each(drop);

    let failure = Err(TransportError::http(500, "Internal Server Error"));
    assert!(editor.complete(load.complete(failure)));

    assert_eq!(editor.state(), EditorState::Failed);
    assert_eq!(editor.session().unwrap().content(), None);
    assert_eq!(
        editor.drain_events().collect::<Vec<_>>(),
        vec![EditorEvent::Alert {
            message: "error:Internal Server Error".into()
        }]
    );
    assert_eq!(editor.table().rows(), before.as_slice());
}

#[test]
fn test_undecodable_load_is_a_parse_failure() {
    let mut editor = editor();
    let load = open(&mut editor, "1");
    editor.drain_events().for_each(drop);
    editor.complete(load.complete(Ok("<html>login</html>".into())));
    let alert = editor.drain_events().find_map(|e| match e {
        EditorEvent::Alert { message } => Some(message),
        _ => None,
    });
    assert!(alert.is_some_and(|m| m.starts_with("parsererror:")));
}

#[test]
fn test_submit_sends_serialized_form_and_disables_control() {
    let mut editor = editor();
    loaded(&mut editor, "1");
    assert!(editor.set_field("price", "12.00"));
    editor.drain_events().for_each(drop);

    let submit = editor.submit().unwrap();
    assert_eq!(submit.kind(), RequestKind::Submit);
    assert_eq!(submit.request().form.get("price"), Some("12.00"));
    assert_eq!(submit.request().form.get("csrfmiddlewaretoken"), Some("tok"));
    assert_eq!(editor.state(), EditorState::Submitting);
    assert!(editor.session().unwrap().is_submit_disabled());
    assert_eq!(
        editor.drain_events().collect::<Vec<_>>(),
        vec![EditorEvent::SubmitDisabled {
            token: submit.token()
        }]
    );

    // Duplicate submission is not possible.
    assert!(editor.submit().is_none());
    assert!(!editor.set_field("price", "13.00"));
}

#[test]
fn test_submit_success_replaces_only_originating_row() {
    let mut editor = editor();
    editor.table_mut().toggle_all(true);
    loaded(&mut editor, "2");
    let submit = editor.submit().unwrap();
    let token = submit.token();
    editor.drain_events().for_each(drop);

    let row = "<tr><td>pear</td><td>12.00</td></tr>";
    assert!(editor.complete(submit.complete(ok(true, row))));

    assert_eq!(editor.state(), EditorState::Closed);
    assert!(editor.session().is_none());
    let rows = editor.table().rows();
    assert_eq!(rows[0].markup, "<tr><td>apple</td><td>1.00</td></tr>");
    assert!(rows[0].selected);
    assert_eq!(rows[1].markup, row);
    assert!(!rows[1].selected);
    assert_eq!(
        editor.drain_events().collect::<Vec<_>>(),
        vec![
            EditorEvent::RowReplaced { row: "2".into() },
            EditorEvent::BoxClosed { token },
        ]
    );
}

#[test]
fn test_validation_failure_redisplays_form_with_submit_enabled() {
    let mut editor = editor();
    loaded(&mut editor, "1");
    let submit = editor.submit().unwrap();
    let token = submit.token();

    let errors = r#"<ul class="errorlist"><li>Enter a number.</li></ul><input name="price" value="abc">"#;
    assert!(editor.complete(submit.complete(ok(false, errors))));

    assert_eq!(editor.state(), EditorState::Open);
    let session = editor.session().unwrap();
    assert_eq!(session.token(), token);
    assert_eq!(session.content(), Some(errors));
    assert!(!session.is_submit_disabled());
    assert_eq!(editor.table().rows()[0].markup, "<tr><td>apple</td><td>1.00</td></tr>");

    assert!(editor.submit().is_some());
}

#[test]
fn test_submit_failure_keeps_control_disabled() {
    let mut editor = editor();
    loaded(&mut editor, "1");
    let submit = editor.submit().unwrap();

    let failure = Err(TransportError::Timeout(std::time::Duration::from_secs(30)));
    assert!(editor.complete(submit.complete(failure)));

    assert_eq!(editor.state(), EditorState::Failed);
    assert!(editor.session().unwrap().is_submit_disabled());
    assert_eq!(editor.session().unwrap().content(), Some(FORM));
    assert!(editor.submit().is_none());
    assert!(
        editor
            .drain_events()
            .any(|e| e == EditorEvent::Alert { message: "timeout:".into() })
    );

    // Re-opening is the way out.
    open(&mut editor, "1");
    assert_eq!(editor.state(), EditorState::Loading);
}
