use std::collections::VecDeque;

use crate::config::EditorConfig;
use crate::error::TransportError;
use crate::form::EditForm;
use crate::placement::{BoxPlacement, CellOffset};
use crate::protocol::{EditResponse, FormData};
use crate::table::ListTable;
use crate::transport::PostRequest;

use super::events::EditorEvent;
use super::request::{Completion, PendingRequest, RequestKind};
use super::session::{EditSession, EditTarget, Phase, SessionToken};

/// Observable state of the editor as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    Loading,
    Open,
    Submitting,
    Failed,
}

impl From<Phase> for EditorState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Loading => EditorState::Loading,
            Phase::Open => EditorState::Open,
            Phase::Submitting => EditorState::Submitting,
            Phase::Failed => EditorState::Failed,
        }
    }
}

/// Inline editing controller for one page.
///
/// Owns the list table and the single edit-box slot. All methods run on the
/// host's event loop; requests are returned as [`PendingRequest`]s and their
/// outcomes come back through [`complete`](Self::complete). UI effects are
/// queued as [`EditorEvent`]s.
#[derive(Debug)]
pub struct TableEditor {
    config: EditorConfig,
    csrf_token: Option<String>,
    table: ListTable,
    session: Option<EditSession>,
    last_token: u64,
    events: VecDeque<EditorEvent>,
}

impl TableEditor {
    pub fn new(table: ListTable, config: EditorConfig) -> Self {
        Self {
            config,
            csrf_token: None,
            table,
            session: None,
            last_token: 0,
            events: VecDeque::new(),
        }
    }

    /// Sets the CSRF token sent with load requests.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn set_csrf_token(&mut self, token: Option<String>) {
        self.csrf_token = token;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn table(&self) -> &ListTable {
        &self.table
    }

    /// Mutable table access for row selection.
    pub fn table_mut(&mut self) -> &mut ListTable {
        &mut self.table
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> EditorState {
        self.session
            .as_ref()
            .map(|s| s.phase.into())
            .unwrap_or(EditorState::Closed)
    }

    /// Take the queued UI effects, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EditorEvent> + '_ {
        self.events.drain(..)
    }

    /// An editable cell was clicked: replace any open box with a new one placed
    /// at the cell and request the edit form.
    ///
    /// Returns `None` (and leaves any open box alone) when the cell is not
    /// editable.
    pub fn edit(
        &mut self,
        target: EditTarget,
        cell: CellOffset,
        document_width: i32,
    ) -> Option<PendingRequest> {
        if !self.table.is_editable(&target.row, &target.column) {
            log::debug!(
                "[editor] {}/{} is not editable",
                target.row,
                target.column
            );
            return None;
        }

        self.discard_session();

        self.last_token += 1;
        let token = SessionToken(self.last_token);
        let placement = BoxPlacement::compute(
            cell,
            self.config.box_width,
            document_width,
            self.config.viewport_margin,
        );

        let mut form = FormData::new()
            .with(&self.config.action_field, &self.config.edit_action)
            .with(&self.config.column_field, target.column.as_str())
            .with(&self.config.id_field, target.row.as_str());
        if let Some(csrf) = &self.csrf_token {
            form.push(&self.config.csrf_field, csrf);
        }

        log::debug!(
            "[editor] open {} for {}/{} at {:?}",
            token,
            target.row,
            target.column,
            placement
        );
        self.session = Some(EditSession::loading(token, target.clone(), placement));
        self.events.push_back(EditorEvent::BoxOpened {
            token,
            target,
            placement,
        });

        Some(PendingRequest::new(
            token,
            RequestKind::Load,
            PostRequest::to_page(form),
        ))
    }

    /// Close control activated: remove the box, whatever its phase.
    pub fn close(&mut self) -> bool {
        self.discard_session()
    }

    /// Set a field of the open form. Only possible while the form is editable.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.editable_form()
            .is_some_and(|form| form.set_value(name, value))
    }

    /// Check or uncheck a checkbox (or pick a radio value) in the open form.
    pub fn set_checked(&mut self, name: &str, value: Option<&str>, checked: bool) -> bool {
        self.editable_form()
            .is_some_and(|form| form.set_checked(name, value, checked))
    }

    /// Submit control activated: disable it and send the serialised form.
    ///
    /// Returns `None` if there is no open form or its submit control is
    /// disabled.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        let session = self.session.as_mut()?;
        if session.phase != Phase::Open || session.submit_disabled {
            return None;
        }
        let form = session.form.as_ref()?.serialize();
        session.phase = Phase::Submitting;
        session.submit_disabled = true;
        let token = session.token;

        log::debug!("[editor] submit {} ({} fields)", token, form.len());
        self.events.push_back(EditorEvent::SubmitDisabled { token });

        Some(PendingRequest::new(
            token,
            RequestKind::Submit,
            PostRequest::to_page(form),
        ))
    }

    /// Apply a request outcome. Completions for boxes that were closed or
    /// replaced are dropped. Returns true if the completion was applied.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let Completion {
            token,
            kind,
            result,
        } = completion;

        let phase = match self.session.as_ref() {
            Some(session) if session.token == token => session.phase,
            _ => {
                log::debug!("[editor] dropping stale {:?} completion for {}", kind, token);
                return false;
            }
        };

        match (kind, phase) {
            (RequestKind::Load, Phase::Loading) => self.apply_load(result),
            (RequestKind::Submit, Phase::Submitting) => self.apply_submit(result),
            _ => {
                log::debug!(
                    "[editor] ignoring {:?} completion for {} in {:?}",
                    kind,
                    token,
                    phase
                );
                false
            }
        }
    }

    fn apply_load(&mut self, result: Result<EditResponse, TransportError>) -> bool {
        match result {
            Ok(response) if response.success => {
                self.show_content(response.content);
                true
            }
            Ok(_) => {
                log::debug!("[editor] load declined by server");
                false
            }
            Err(error) => {
                self.fail(error);
                true
            }
        }
    }

    fn apply_submit(&mut self, result: Result<EditResponse, TransportError>) -> bool {
        match result {
            Ok(response) if response.success => {
                let Some(session) = self.session.take() else {
                    return false;
                };
                let row = session.target.row;
                if self.table.replace_row(&row, response.content) {
                    self.events.push_back(EditorEvent::RowReplaced { row });
                } else {
                    log::warn!("[editor] row {} vanished before its update landed", row);
                }
                log::debug!("[editor] {} saved", session.token);
                self.events.push_back(EditorEvent::BoxClosed {
                    token: session.token,
                });
                true
            }
            Ok(response) => {
                // Validation errors: show the re-rendered form; its own submit
                // control starts enabled.
                self.show_content(response.content);
                true
            }
            Err(error) => {
                self.fail(error);
                true
            }
        }
    }

    fn show_content(&mut self, markup: String) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let form = EditForm::parse(&markup);
        let focus = form.first_focusable().and_then(|f| f.name.clone());
        let autocomplete = form.has_autocomplete();
        let token = session.token;

        session.content = Some(markup);
        session.form = Some(form);
        session.phase = Phase::Open;
        session.submit_disabled = false;
        session.focused_field = focus.clone();

        self.events.push_back(EditorEvent::ContentReplaced { token });
        if let Some(name) = focus {
            self.events.push_back(EditorEvent::FocusField { token, name });
        }
        if autocomplete {
            self.events.push_back(EditorEvent::InitAutocomplete);
        }
    }

    fn fail(&mut self, error: TransportError) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        log::warn!("[editor] {} failed in {:?}: {}", session.token, session.phase, error);
        session.phase = Phase::Failed;
        self.events.push_back(EditorEvent::Alert {
            message: error.alert_message(),
        });
    }

    fn editable_form(&mut self) -> Option<&mut EditForm> {
        self.session
            .as_mut()
            .filter(|s| s.phase == Phase::Open)
            .and_then(|s| s.form.as_mut())
    }

    fn discard_session(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        log::debug!("[editor] discard {} in {:?}", session.token, session.phase);
        self.events.push_back(EditorEvent::BoxClosed {
            token: session.token,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, TableRow};

    fn editor() -> TableEditor {
        let table = ListTable::with_rows(
            vec![Column::new("name"), Column::editable("price")],
            vec![TableRow::new("7", "<tr><td>7</td></tr>")],
        );
        TableEditor::new(table, EditorConfig::default()).with_csrf_token("tok")
    }

    #[test]
    fn test_load_request_payload() {
        let mut editor = editor();
        let pending = editor
            .edit(EditTarget::new("7", "price"), CellOffset::new(10, 20), 1000)
            .unwrap();
        assert_eq!(pending.kind(), RequestKind::Load);
        let request = pending.request();
        assert_eq!(request.path, None);
        assert_eq!(
            request.form.pairs(),
            &[
                ("_action".to_string(), "edit".to_string()),
                ("_column".to_string(), "price".to_string()),
                ("id".to_string(), "7".to_string()),
                ("csrfmiddlewaretoken".to_string(), "tok".to_string()),
            ]
        );
        assert_eq!(editor.state(), EditorState::Loading);
    }

    #[test]
    fn test_box_is_shifted_left_near_the_edge() {
        let mut editor = editor();
        editor.edit(EditTarget::new("7", "price"), CellOffset::new(800, 40), 1000);
        let placement = editor.session().unwrap().placement();
        // 1000 - 800 - 400 - 50 = -250
        assert_eq!((placement.left, placement.top), (550, 40));
    }

    #[test]
    fn test_non_editable_cell_keeps_open_box() {
        let mut editor = editor();
        editor.edit(EditTarget::new("7", "price"), CellOffset::default(), 1000);
        let token = editor.session().unwrap().token();
        assert!(
            editor
                .edit(EditTarget::new("7", "name"), CellOffset::default(), 1000)
                .is_none()
        );
        assert_eq!(editor.session().unwrap().token(), token);
    }

    #[test]
    fn test_submit_requires_open_form() {
        let mut editor = editor();
        assert!(editor.submit().is_none());
        editor.edit(EditTarget::new("7", "price"), CellOffset::default(), 1000);
        assert!(editor.submit().is_none());
        assert!(!editor.set_field("price", "3"));
    }

    #[test]
    fn test_close_from_any_state() {
        let mut editor = editor();
        assert!(!editor.close());
        editor.edit(EditTarget::new("7", "price"), CellOffset::default(), 1000);
        assert!(editor.close());
        assert_eq!(editor.state(), EditorState::Closed);
        let events: Vec<_> = editor.drain_events().collect();
        assert!(matches!(events.last(), Some(EditorEvent::BoxClosed { .. })));
    }
}
