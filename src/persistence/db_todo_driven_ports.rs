use crate::domain;
use crate::domain::todo::{CreateTodo, TodoRecord, TodoUpdate};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, query, query_as};
use uuid::Uuid;

#[derive(FromRow)]
struct TodoItemRow {
    id: Uuid,
    text: String,
    notes: String,
    completed: bool,
    assignee: String,
    created_at: DateTime<Utc>,
}

impl From<TodoItemRow> for TodoRecord {
    fn from(value: TodoItemRow) -> Self {
        TodoRecord {
            id: value.id,
            text: value.text,
            notes: value.notes,
            completed: value.completed,
            assignee: value.assignee,
            created_at: value.created_at,
        }
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoRecord>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<TodoRecord> = query_as::<_, TodoItemRow>(
            "SELECT ti.* FROM todo_item ti ORDER BY ti.created_at DESC",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todo items")?
        .into_iter()
        .map(TodoRecord::from)
        .collect();

        Ok(todos)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        todo: &CreateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoRecord, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TodoItemRow>(
            "INSERT INTO todo_item(text, notes, assignee) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&todo.text)
        .bind(&todo.notes)
        .bind(&todo.assignee)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(created.into())
    }

    async fn update_todo(
        &self,
        todo_id: Uuid,
        update: &TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoRecord>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // NULL parameters keep the stored value
        let updated = query_as::<_, TodoItemRow>(
            "UPDATE todo_item SET \
                text = COALESCE($1, text), \
                notes = COALESCE($2, notes), \
                completed = COALESCE($3, completed), \
                assignee = COALESCE($4, assignee) \
            WHERE id = $5 RETURNING *",
        )
        .bind(&update.text)
        .bind(&update.notes)
        .bind(update.completed)
        .bind(&update.assignee)
        .bind(todo_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?;

        Ok(updated.map(TodoRecord::from))
    }

    async fn delete_todo(
        &self,
        todo_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM todo_item WHERE id = $1")
            .bind(todo_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
