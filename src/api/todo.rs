use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use crate::routing_utils::{
    BasicErrorResponse, Json, TodoErrorResponse, ValidationErrorResponse, parse_todo_id,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, put};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(list_todos, create_todo, update_todo, delete_todo))]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Builds a router for everything under "/api/todos"
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();

                list_todos(&mut ext_cxn, &domain::todo::TodoService).await
            })
            .post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    create_todo(new_todo, &mut ext_cxn, &domain::todo::TodoService).await
                },
            ),
        )
        .route(
            "/:todo_id",
            put(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(update): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    update_todo(&todo_id, update, &mut ext_cxn, &domain::todo::TodoService).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    delete_todo(&todo_id, &mut ext_cxn, &domain::todo::TodoService).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "All todos, newest first", body = Vec<dto::TodoRecord>),
        (status = 500, description = "The todo store could not be reached", body = BasicErrorResponse),
    ),
)]
/// Retrieves every todo, newest first
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Vec<dto::TodoRecord>>, ErrorResponse> {
    info!("Listing todos");
    let todos = todo_service
        .list_todos(&mut *ext_cxn, &DbTodoReader)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(todos.into_iter().map(dto::TodoRecord::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "Todo created", body = dto::TodoRecord),
        (status = 400, description = "Text was missing or the body was malformed", body = BasicErrorResponse),
        (status = 500, description = "The todo store could not be reached", body = BasicErrorResponse),
    ),
)]
/// Creates a todo, filling in defaults for any optional fields left out
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<(StatusCode, Json<dto::TodoRecord>), ErrorResponse> {
    info!("Creating a todo");
    new_todo.validate().map_err(|validation_errs| {
        warn!("Rejected new todo: {validation_errs}");
        ValidationErrorResponse::from(validation_errs)
    })?;

    let domain_todo = domain::todo::NewTodo::from(new_todo);
    let created = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, &DbTodoWriter)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok((StatusCode::CREATED, Json(dto::TodoRecord::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = String, Path, description = "UUID of the todo to update")),
    request_body = dto::UpdateTodo,
    responses(
        (status = 200, description = "Todo after the update", body = dto::TodoRecord),
        (status = 400, description = "The ID or body was malformed", body = BasicErrorResponse),
        (status = 404, description = "No todo has the given ID", body = BasicErrorResponse),
        (status = 500, description = "The todo store could not be reached", body = BasicErrorResponse),
    ),
)]
/// Applies the fields present in the request body to a todo
async fn update_todo(
    raw_todo_id: &str,
    update: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::TodoRecord>, ErrorResponse> {
    info!("Updating todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;

    let domain_update = domain::todo::TodoUpdate::from(update);
    let updated = todo_service
        .update_todo(todo_id, &domain_update, &mut *ext_cxn, &DbTodoWriter)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(dto::TodoRecord::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = String, Path, description = "UUID of the todo to delete")),
    responses(
        (status = 200, description = "Todo deleted", body = dto::DeletedTodo),
        (status = 400, description = "The ID was malformed", body = BasicErrorResponse),
        (status = 404, description = "No todo has the given ID", body = BasicErrorResponse),
        (status = 500, description = "The todo store could not be reached", body = BasicErrorResponse),
    ),
)]
/// Deletes a todo
async fn delete_todo(
    raw_todo_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::DeletedTodo>, ErrorResponse> {
    info!("Deleting todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;

    todo_service
        .delete_todo(todo_id, &mut *ext_cxn, &DbTodoWriter)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(dto::DeletedTodo::default()))
}
