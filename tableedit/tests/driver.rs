use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tableedit::changer::{Changer, ChangerOutcome};
use tableedit::editor::{Completion, EditTarget, EditorState};
use tableedit::placement::CellOffset;
use tableedit::table::{Column, ListTable, TableRow};
use tableedit::{EditorConfig, PostRequest, RequestDriver, TableEditor, Transport, TransportError};

/// Transport answering every request with a canned body and recording what
/// it was sent.
#[derive(Default)]
struct FakeTransport {
    reply: Mutex<Vec<Result<String, TransportError>>>,
    seen: Mutex<Vec<PostRequest>>,
}

impl FakeTransport {
    fn replying(replies: Vec<Result<String, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::default(),
        })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post(&self, request: &PostRequest) -> Result<String, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::http(404, "Not Found")))
    }
}

enum Message {
    Editor(Completion),
    Changer(Result<String, TransportError>),
}

impl From<Completion> for Message {
    fn from(completion: Completion) -> Self {
        Message::Editor(completion)
    }
}

fn editor() -> TableEditor {
    let table = ListTable::with_rows(
        vec![Column::editable("price")],
        vec![TableRow::new("1", "<tr><td>1.00</td></tr>")],
    );
    TableEditor::new(table, EditorConfig::default())
}

#[tokio::test]
async fn test_edit_round_trip_through_driver() {
    let transport = FakeTransport::replying(vec![
        Ok(r#"{"success": true, "content": "<input name=\"price\" value=\"1.00\">"}"#.into()),
        Ok(r#"{"success": true, "content": "<tr><td>2.00</td></tr>"}"#.into()),
    ]);
    let (driver, mut rx) = RequestDriver::<Message>::new(transport.clone());
    let mut editor = editor();

    let load = editor
        .edit(EditTarget::new("1", "price"), CellOffset::default(), 800)
        .unwrap();
    driver.dispatch_edit(load);
    let Some(Message::Editor(completion)) = rx.recv().await else {
        panic!("expected editor completion");
    };
    assert!(editor.complete(completion));
    assert_eq!(editor.state(), EditorState::Open);

    editor.set_field("price", "2.00");
    driver.dispatch_edit(editor.submit().unwrap());
    let Some(Message::Editor(completion)) = rx.recv().await else {
        panic!("expected editor completion");
    };
    assert!(editor.complete(completion));
    assert_eq!(editor.state(), EditorState::Closed);
    assert_eq!(editor.table().rows()[0].markup, "<tr><td>2.00</td></tr>");

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].form.get("_action"), Some("edit"));
    assert_eq!(seen[1].form.get("price"), Some("2.00"));
}

#[tokio::test]
async fn test_stale_completion_from_driver_is_dropped() {
    let transport = FakeTransport::replying(vec![
        Ok(r#"{"success": true, "content": "<p>old</p>"}"#.into()),
        Ok(r#"{"success": true, "content": "<p>new</p>"}"#.into()),
    ]);
    let (driver, mut rx) = RequestDriver::<Message>::new(transport);
    let mut editor = editor();
    let target = || EditTarget::new("1", "price");

    driver.dispatch_edit(editor.edit(target(), CellOffset::default(), 800).unwrap());
    driver.dispatch_edit(editor.edit(target(), CellOffset::default(), 800).unwrap());

    let mut applied = 0;
    for _ in 0..2 {
        if let Some(Message::Editor(completion)) = rx.recv().await
            && editor.complete(completion)
        {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(editor.session().unwrap().token().value(), 2);
    assert!(editor.session().unwrap().content().is_some());
}

#[tokio::test]
async fn test_changer_through_driver() {
    let transport = FakeTransport::replying(vec![Ok(r#"{"value": 1}"#.into())]);
    let (driver, mut rx) = RequestDriver::<Message>::new(transport.clone());
    let mut changer = Changer::new("products/1/active/").with_value(0);

    let request = changer.activate(|_| true).unwrap();
    driver.dispatch(request, Message::Changer);
    let Some(Message::Changer(result)) = rx.recv().await else {
        panic!("expected changer completion");
    };
    assert_eq!(changer.complete(result), ChangerOutcome::Switched(Some(1)));
    assert_eq!(
        transport.seen.lock().unwrap()[0].path.as_deref(),
        Some("products/1/active/")
    );
}
