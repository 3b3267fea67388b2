use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::{DateTime, Utc};
use derive_more::Display;
use tracing::info;
use uuid::Uuid;

/// Assignee given to todos created without one
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";

/// A single persisted todo
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoRecord {
    pub id: Uuid,
    pub text: String,
    pub notes: String,
    pub completed: bool,
    pub assignee: String,
    pub created_at: DateTime<Utc>,
}

/// A todo as submitted by a caller, before defaults are filled in
#[derive(Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    pub text: String,
    pub notes: Option<String>,
    pub assignee: Option<String>,
}

impl NewTodo {
    /// Resolves missing or blank optional fields to their defaults
    pub fn with_defaults(&self) -> CreateTodo {
        CreateTodo {
            text: self.text.clone(),
            notes: self.notes.clone().unwrap_or_default(),
            assignee: self
                .assignee
                .as_ref()
                .filter(|assignee| !assignee.is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_owned()),
        }
    }
}

/// A fully-specified todo ready to be written to the store
#[derive(Debug, Display, PartialEq, Eq)]
#[display("\"{text}\" assigned to {assignee}")]
pub struct CreateTodo {
    pub text: String,
    pub notes: String,
    pub assignee: String,
}

/// A partial update. Fields left as [None] keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub text: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub assignee: Option<String>,
}

impl TodoUpdate {
    /// Merges the present fields onto an existing record
    pub fn apply_to(&self, record: &mut TodoRecord) {
        if let Some(ref text) = self.text {
            record.text = text.clone();
        }
        if let Some(ref notes) = self.notes {
            record.notes = notes.clone();
        }
        if let Some(completed) = self.completed {
            record.completed = completed;
        }
        if let Some(ref assignee) = self.assignee {
            record.assignee = assignee.clone();
        }
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoRecord>, anyhow::Error>;
    }

    pub trait TodoWriter {
        async fn create_todo(
            &self,
            todo: &CreateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoRecord, anyhow::Error>;

        /// Returns [None] if no todo has the given ID
        async fn update_todo(
            &self,
            todo_id: Uuid,
            update: &TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoRecord>, anyhow::Error>;

        /// Returns whether a todo was actually removed
        async fn delete_todo(
            &self,
            todo_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("Todo text is required.")]
        MissingText,
        #[error("Todo {0} does not exist.")]
        NotFound(Uuid),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn list_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<TodoRecord>, TodoError>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoRecord, TodoError>;
        async fn update_todo(
            &self,
            todo_id: Uuid,
            update: &TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoRecord, TodoError>;
        async fn delete_todo(
            &self,
            todo_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), TodoError>;
    }
}

pub struct TodoService;

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<TodoRecord>, TodoError> {
        let mut todos = todo_read
            .all_todos(&mut *ext_cxn)
            .await
            .context("listing todos")?;
        // Newest first
        todos.sort_by(|first, second| second.created_at.cmp(&first.created_at));

        Ok(todos)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoRecord, TodoError> {
        if new_todo.text.is_empty() {
            return Err(TodoError::MissingText);
        }

        let todo = new_todo.with_defaults();
        info!("Creating todo {todo}");
        let created = todo_write
            .create_todo(&todo, &mut *ext_cxn)
            .await
            .context("creating a todo")?;

        Ok(created)
    }

    async fn update_todo(
        &self,
        todo_id: Uuid,
        update: &TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoRecord, TodoError> {
        let updated = todo_write
            .update_todo(todo_id, update, &mut *ext_cxn)
            .await
            .context("updating a todo")?;

        updated.ok_or(TodoError::NotFound(todo_id))
    }

    async fn delete_todo(
        &self,
        todo_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        let removed = todo_write
            .delete_todo(todo_id, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;

        if removed {
            Ok(())
        } else {
            Err(TodoError::NotFound(todo_id))
        }
    }
}
