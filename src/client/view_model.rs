use super::TodoApi;
use crate::domain::todo::DEFAULT_ASSIGNEE;
use crate::dto::{NewTodo, TodoRecord, UpdateTodo};
use tracing::error;
use uuid::Uuid;

/// Longest notes preview shown in the list before it is cut off, in characters
pub const NOTES_PREVIEW_CHARS: usize = 50;

/// The notes snippet shown under a todo in the list, or None when it has no notes. Notes
/// over [NOTES_PREVIEW_CHARS] characters are cut and end in "...".
pub fn notes_preview(todo: &TodoRecord) -> Option<String> {
    if todo.notes.is_empty() {
        return None;
    }

    let mut chars = todo.notes.chars();
    let mut preview: String = chars.by_ref().take(NOTES_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        preview.push_str("...");
    }

    Some(preview)
}

/// State behind the notes editor modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesEditor {
    /// Snapshot of the todo as it was when the modal opened
    pub selected: TodoRecord,
    pub draft_notes: String,
}

/// Holds the todo list as displayed to the user along with in-progress form input, and keeps
/// it reconciled with the server. Local state only ever changes after the server confirms
/// an operation, so failures leave it untouched.
pub struct TodoListViewModel<Api> {
    api: Api,
    todos: Vec<TodoRecord>,
    draft_text: String,
    draft_assignee: String,
    notes_editor: Option<NotesEditor>,
}

impl<Api: TodoApi> TodoListViewModel<Api> {
    pub fn new(api: Api) -> Self {
        TodoListViewModel {
            api,
            todos: Vec::new(),
            draft_text: String::new(),
            draft_assignee: String::new(),
            notes_editor: None,
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Todos in display order, newest first
    pub fn todos(&self) -> &[TodoRecord] {
        &self.todos
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn draft_assignee(&self) -> &str {
        &self.draft_assignee
    }

    pub fn set_draft_assignee(&mut self, assignee: impl Into<String>) {
        self.draft_assignee = assignee.into();
    }

    pub fn is_modal_open(&self) -> bool {
        self.notes_editor.is_some()
    }

    pub fn notes_editor(&self) -> Option<&NotesEditor> {
        self.notes_editor.as_ref()
    }

    /// Heading for the notes modal, naming the todo being edited. None while the modal is closed.
    pub fn notes_modal_title(&self) -> Option<String> {
        self.notes_editor
            .as_ref()
            .map(|editor| format!("Notes for: {}", editor.selected.text))
    }

    /// Replaces the notes draft. Ignored when the modal is closed.
    pub fn set_draft_notes(&mut self, notes: impl Into<String>) {
        if let Some(ref mut editor) = self.notes_editor {
            editor.draft_notes = notes.into();
        }
    }

    /// Replaces the local list with the server's
    pub async fn load(&mut self) -> Result<(), anyhow::Error> {
        let todos = self.api.fetch_todos().await.inspect_err(|err| {
            error!("Error fetching todos: {err:#}");
        })?;
        self.todos = todos;

        Ok(())
    }

    /// Creates a todo from the drafts and puts it at the top of the list. Does nothing if the
    /// draft text is blank.
    pub async fn add(&mut self) -> Result<(), anyhow::Error> {
        if self.draft_text.trim().is_empty() {
            return Ok(());
        }

        let assignee = match self.draft_assignee.trim() {
            "" => DEFAULT_ASSIGNEE,
            trimmed => trimmed,
        };
        let new_todo = NewTodo {
            text: Some(self.draft_text.clone()),
            notes: Some(String::new()),
            assignee: Some(assignee.to_owned()),
        };

        let created = self.api.create_todo(&new_todo).await.inspect_err(|err| {
            error!("Error adding todo: {err:#}");
        })?;
        self.todos.insert(0, created);
        self.draft_text.clear();
        self.draft_assignee.clear();

        Ok(())
    }

    /// Flips a todo's completion flag, given the flag as currently displayed
    pub async fn toggle(&mut self, todo_id: Uuid, completed: bool) -> Result<(), anyhow::Error> {
        let update = UpdateTodo {
            completed: Some(!completed),
            ..UpdateTodo::default()
        };

        let updated = self
            .api
            .update_todo(todo_id, &update)
            .await
            .inspect_err(|err| {
                error!("Error toggling todo {todo_id}: {err:#}");
            })?;
        self.replace_todo(updated);

        Ok(())
    }

    pub async fn delete(&mut self, todo_id: Uuid) -> Result<(), anyhow::Error> {
        self.api.delete_todo(todo_id).await.inspect_err(|err| {
            error!("Error deleting todo {todo_id}: {err:#}");
        })?;
        self.todos.retain(|todo| todo.id != todo_id);

        Ok(())
    }

    /// Opens the notes modal for a todo in the list, seeding the draft from its current notes.
    /// Returns false if no such todo is displayed.
    pub fn open_notes(&mut self, todo_id: Uuid) -> bool {
        let Some(selected) = self.todos.iter().find(|todo| todo.id == todo_id) else {
            return false;
        };

        self.notes_editor = Some(NotesEditor {
            draft_notes: selected.notes.clone(),
            selected: selected.clone(),
        });
        true
    }

    /// Persists the draft notes and closes the modal. The modal stays open with its draft
    /// intact if the save fails.
    pub async fn save_notes(&mut self) -> Result<(), anyhow::Error> {
        let Some(ref editor) = self.notes_editor else {
            return Ok(());
        };

        // completed and assignee are re-sent from the snapshot along with the notes
        let update = UpdateTodo {
            notes: Some(editor.draft_notes.clone()),
            completed: Some(editor.selected.completed),
            assignee: Some(editor.selected.assignee.clone()),
            ..UpdateTodo::default()
        };
        let todo_id = editor.selected.id;

        let updated = self
            .api
            .update_todo(todo_id, &update)
            .await
            .inspect_err(|err| {
                error!("Error updating notes for todo {todo_id}: {err:#}");
            })?;
        self.replace_todo(updated);
        self.notes_editor = None;

        Ok(())
    }

    /// Closes the modal, discarding the draft
    pub fn cancel_notes(&mut self) {
        self.notes_editor = None;
    }

    fn replace_todo(&mut self, updated: TodoRecord) {
        if let Some(existing) = self.todos.iter_mut().find(|todo| todo.id == updated.id) {
            *existing = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_util::{MockTodoApi, server_todo};
    use crate::dto::DeletedTodo;
    use anyhow::anyhow;
    use speculoos::prelude::*;
    use std::sync::Mutex;

    /// View-model already showing `todos`
    fn loaded_view_model(
        api: MockTodoApi,
        todos: &[TodoRecord],
    ) -> TodoListViewModel<Mutex<MockTodoApi>> {
        let mut view_model = TodoListViewModel::new(Mutex::new(api));
        view_model.todos = todos.to_vec();
        view_model
    }

    mod load {
        use super::*;

        #[tokio::test]
        async fn replaces_local_list() {
            let mut api = MockTodoApi::new();
            let fetched = vec![server_todo("Newest"), server_todo("Oldest")];
            api.fetch_todos_result.set_returned_anyhow(Ok(fetched.clone()));
            let mut view_model = loaded_view_model(api, &[server_todo("Stale")]);

            let load_result = view_model.load().await;
            assert_that!(load_result).is_ok();
            assert_eq!(fetched.as_slice(), view_model.todos());
        }

        #[tokio::test]
        async fn failure_keeps_local_list() {
            let mut api = MockTodoApi::new();
            api.fetch_todos_result
                .set_returned_anyhow(Err(anyhow!("connection refused")));
            let existing = vec![server_todo("Keep me")];
            let mut view_model = loaded_view_model(api, &existing);

            let load_result = view_model.load().await;
            assert_that!(load_result).is_err();
            assert_eq!(existing.as_slice(), view_model.todos());
        }
    }

    mod add {
        use super::*;

        #[tokio::test]
        async fn prepends_and_clears_drafts() {
            let mut api = MockTodoApi::new();
            let created = TodoRecord {
                assignee: "Sam".to_owned(),
                ..server_todo("Buy milk")
            };
            api.create_todo_result.set_returned_anyhow(Ok(created.clone()));
            let older = server_todo("Older");
            let mut view_model = loaded_view_model(api, &[older.clone()]);
            view_model.set_draft_text("Buy milk");
            view_model.set_draft_assignee("  Sam ");

            let add_result = view_model.add().await;
            assert_that!(add_result).is_ok();
            assert_eq!([created, older].as_slice(), view_model.todos());
            assert!(view_model.draft_text().is_empty());
            assert!(view_model.draft_assignee().is_empty());

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            assert!(matches!(locked_api.create_todo_result.calls(), [
                NewTodo {
                    text: Some(text),
                    notes: Some(notes),
                    assignee: Some(assignee),
                }
            ] if text == "Buy milk" && notes.is_empty() && assignee == "Sam"));
        }

        #[tokio::test]
        async fn blank_assignee_becomes_unassigned() {
            let mut api = MockTodoApi::new();
            api.create_todo_result
                .set_returned_anyhow(Ok(server_todo("Buy milk")));
            let mut view_model = loaded_view_model(api, &[]);
            view_model.set_draft_text("Buy milk");
            view_model.set_draft_assignee("   ");

            let add_result = view_model.add().await;
            assert_that!(add_result).is_ok();

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            assert!(matches!(locked_api.create_todo_result.calls(), [
                NewTodo {
                    assignee: Some(assignee),
                    ..
                }
            ] if assignee == DEFAULT_ASSIGNEE));
        }

        #[tokio::test]
        async fn blank_text_does_nothing() {
            let mut view_model = loaded_view_model(MockTodoApi::new(), &[]);
            view_model.set_draft_text(" \t ");
            view_model.set_draft_assignee("Sam");

            let add_result = view_model.add().await;
            assert_that!(add_result).is_ok();
            assert!(view_model.todos().is_empty());
            assert_eq!("Sam", view_model.draft_assignee());

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            assert!(locked_api.create_todo_result.calls().is_empty());
        }

        #[tokio::test]
        async fn failure_keeps_drafts_and_list() {
            let mut api = MockTodoApi::new();
            api.create_todo_result
                .set_returned_anyhow(Err(anyhow!("failed to create a todo (400): text required")));
            let mut view_model = loaded_view_model(api, &[]);
            view_model.set_draft_text("Buy milk");

            let add_result = view_model.add().await;
            assert_that!(add_result).is_err();
            assert!(view_model.todos().is_empty());
            assert_eq!("Buy milk", view_model.draft_text());
        }
    }

    mod toggle {
        use super::*;

        #[tokio::test]
        async fn replaces_todo_with_server_copy() {
            let mut api = MockTodoApi::new();
            let original = server_todo("Buy milk");
            let other = server_todo("Walk the dog");
            let toggled = TodoRecord {
                completed: true,
                ..original.clone()
            };
            api.update_todo_result.set_returned_anyhow(Ok(toggled.clone()));
            let mut view_model = loaded_view_model(api, &[other.clone(), original.clone()]);

            let toggle_result = view_model.toggle(original.id, original.completed).await;
            assert_that!(toggle_result).is_ok();
            assert_eq!([other, toggled].as_slice(), view_model.todos());

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            let [(sent_id, sent_update)] = locked_api.update_todo_result.calls() else {
                panic!("Expected exactly one update call");
            };
            assert_eq!(original.id, *sent_id);
            assert_eq!(Some(true), sent_update.completed);
            assert_that!(sent_update.notes).is_none();
            assert_that!(sent_update.text).is_none();
            assert_that!(sent_update.assignee).is_none();
        }

        #[tokio::test]
        async fn failure_keeps_local_state() {
            let mut api = MockTodoApi::new();
            api.update_todo_result
                .set_returned_anyhow(Err(anyhow!("connection refused")));
            let original = server_todo("Buy milk");
            let mut view_model = loaded_view_model(api, &[original.clone()]);

            let toggle_result = view_model.toggle(original.id, original.completed).await;
            assert_that!(toggle_result).is_err();
            assert_eq!([original].as_slice(), view_model.todos());
        }
    }

    mod delete {
        use super::*;

        #[tokio::test]
        async fn removes_only_that_todo() {
            let mut api = MockTodoApi::new();
            api.delete_todo_result
                .set_returned_anyhow(Ok(DeletedTodo::default()));
            let keep = server_todo("Keep");
            let doomed = server_todo("Doomed");
            let mut view_model = loaded_view_model(api, &[keep.clone(), doomed.clone()]);

            let delete_result = view_model.delete(doomed.id).await;
            assert_that!(delete_result).is_ok();
            assert_eq!([keep].as_slice(), view_model.todos());
        }

        #[tokio::test]
        async fn failure_keeps_todo() {
            let mut api = MockTodoApi::new();
            api.delete_todo_result
                .set_returned_anyhow(Err(anyhow!("failed to delete a todo (404): Todo not found")));
            let doomed = server_todo("Doomed");
            let mut view_model = loaded_view_model(api, &[doomed.clone()]);

            let delete_result = view_model.delete(doomed.id).await;
            assert_that!(delete_result).is_err();
            assert_eq!([doomed].as_slice(), view_model.todos());
        }
    }

    mod notes_preview {
        use super::*;

        fn with_notes(notes: &str) -> TodoRecord {
            TodoRecord {
                notes: notes.to_owned(),
                ..server_todo("Buy milk")
            }
        }

        #[test]
        fn hidden_without_notes() {
            assert_that!(notes_preview(&with_notes(""))).is_none();
        }

        #[test]
        fn short_notes_are_shown_whole() {
            let exactly_fifty = "a".repeat(50);
            assert_that!(notes_preview(&with_notes("Two percent")))
                .is_some()
                .is_equal_to("Two percent".to_owned());
            assert_that!(notes_preview(&with_notes(&exactly_fifty)))
                .is_some()
                .is_equal_to(exactly_fifty.clone());
        }

        #[test]
        fn long_notes_are_cut_at_fifty_chars() {
            let fifty_one = "b".repeat(51);
            assert_that!(notes_preview(&with_notes(&fifty_one)))
                .is_some()
                .is_equal_to(format!("{}...", "b".repeat(50)));
        }

        #[test]
        fn cuts_on_char_boundaries() {
            // Each of these is several bytes long
            let long_multibyte = "é🥛".repeat(30);
            let expected = format!("{}...", "é🥛".repeat(25));
            assert_that!(notes_preview(&with_notes(&long_multibyte)))
                .is_some()
                .is_equal_to(expected);
        }
    }

    mod edit_notes {
        use super::*;

        #[test]
        fn opening_seeds_draft_from_notes() {
            let with_notes = TodoRecord {
                notes: "Two percent".to_owned(),
                ..server_todo("Buy milk")
            };
            let mut view_model = loaded_view_model(MockTodoApi::new(), &[with_notes.clone()]);

            assert!(view_model.open_notes(with_notes.id));
            assert!(view_model.is_modal_open());
            assert_eq!(
                Some(&NotesEditor {
                    selected: with_notes.clone(),
                    draft_notes: "Two percent".to_owned(),
                }),
                view_model.notes_editor()
            );
        }

        #[test]
        fn title_names_the_selected_todo() {
            let todo = server_todo("Buy milk");
            let mut view_model = loaded_view_model(MockTodoApi::new(), &[todo.clone()]);
            assert_that!(view_model.notes_modal_title()).is_none();

            view_model.open_notes(todo.id);
            assert_that!(view_model.notes_modal_title())
                .is_some()
                .is_equal_to("Notes for: Buy milk".to_owned());

            view_model.cancel_notes();
            assert_that!(view_model.notes_modal_title()).is_none();
        }

        #[test]
        fn opening_unknown_todo_does_nothing() {
            let mut view_model = loaded_view_model(MockTodoApi::new(), &[server_todo("Buy milk")]);

            assert!(!view_model.open_notes(Uuid::new_v4()));
            assert!(!view_model.is_modal_open());
        }

        #[tokio::test]
        async fn saving_sends_notes_with_snapshot_fields() {
            let mut api = MockTodoApi::new();
            let original = TodoRecord {
                completed: true,
                assignee: "Robin".to_owned(),
                ..server_todo("Buy milk")
            };
            let saved = TodoRecord {
                notes: "Oat milk instead".to_owned(),
                ..original.clone()
            };
            api.update_todo_result.set_returned_anyhow(Ok(saved.clone()));
            let mut view_model = loaded_view_model(api, &[original.clone()]);

            view_model.open_notes(original.id);
            view_model.set_draft_notes("Oat milk instead");
            let save_result = view_model.save_notes().await;
            assert_that!(save_result).is_ok();
            assert!(!view_model.is_modal_open());
            assert_eq!([saved].as_slice(), view_model.todos());

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            let [(sent_id, sent_update)] = locked_api.update_todo_result.calls() else {
                panic!("Expected exactly one update call");
            };
            assert_eq!(original.id, *sent_id);
            assert_eq!(
                &UpdateTodo {
                    text: None,
                    notes: Some("Oat milk instead".to_owned()),
                    completed: Some(true),
                    assignee: Some("Robin".to_owned()),
                },
                sent_update
            );
        }

        #[tokio::test]
        async fn failed_save_keeps_modal_open() {
            let mut api = MockTodoApi::new();
            api.update_todo_result
                .set_returned_anyhow(Err(anyhow!("connection refused")));
            let original = server_todo("Buy milk");
            let mut view_model = loaded_view_model(api, &[original.clone()]);

            view_model.open_notes(original.id);
            view_model.set_draft_notes("Unsaved thoughts");
            let save_result = view_model.save_notes().await;
            assert_that!(save_result).is_err();
            assert_eq!([original].as_slice(), view_model.todos());
            assert_that!(view_model.notes_editor())
                .is_some()
                .matches(|editor| editor.draft_notes == "Unsaved thoughts");
        }

        #[tokio::test]
        async fn cancelling_discards_draft() {
            let original = server_todo("Buy milk");
            let mut view_model = loaded_view_model(MockTodoApi::new(), &[original.clone()]);

            view_model.open_notes(original.id);
            view_model.set_draft_notes("Never mind");
            view_model.cancel_notes();
            assert!(!view_model.is_modal_open());

            // Reopening starts from the stored notes again
            view_model.open_notes(original.id);
            assert_that!(view_model.notes_editor())
                .is_some()
                .matches(|editor| editor.draft_notes.is_empty());

            let locked_api = view_model.api().lock().expect("mock todo api mutex poisoned");
            assert!(locked_api.update_todo_result.calls().is_empty());
        }
    }
}
