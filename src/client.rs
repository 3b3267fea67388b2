//! Client side of the todo list: a [TodoApi] port for talking to the server, an HTTP
//! adapter for it, and the view-model that keeps the displayed list in sync.

use crate::dto::{DeletedTodo, NewTodo, TodoRecord, UpdateTodo};
use uuid::Uuid;

pub mod http_api;
pub mod view_model;

pub use http_api::HttpTodoApi;
pub use view_model::{TodoListViewModel, notes_preview};

/// Operations the client can request from the todo API
pub trait TodoApi {
    async fn fetch_todos(&self) -> Result<Vec<TodoRecord>, anyhow::Error>;
    async fn create_todo(&self, new_todo: &NewTodo) -> Result<TodoRecord, anyhow::Error>;
    async fn update_todo(
        &self,
        todo_id: Uuid,
        update: &UpdateTodo,
    ) -> Result<TodoRecord, anyhow::Error>;
    async fn delete_todo(&self, todo_id: Uuid) -> Result<DeletedTodo, anyhow::Error>;
}
