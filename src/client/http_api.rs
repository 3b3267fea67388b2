use super::TodoApi;
use crate::dto::{DeletedTodo, NewTodo, TodoRecord, UpdateTodo};
use anyhow::{Context, anyhow};
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Error body returned by the API on failure. Only the message matters to the client.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// [TodoApi] backed by the REST API, propagating trace context on every request
pub struct HttpTodoApi {
    todos_url: String,
    http_client: ClientWithMiddleware,
}

impl HttpTodoApi {
    /// Builds a client for the API rooted at `base_url` (e.g. "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("building the HTTP client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(HttpTodoApi {
            todos_url: format!("{}/api/todos", base_url.trim_end_matches('/')),
            http_client,
        })
    }

    fn todo_url(&self, todo_id: Uuid) -> String {
        format!("{}/{todo_id}", self.todos_url)
    }
}

/// Decodes a successful response body, or turns an error response into an [anyhow::Error]
/// carrying the server's message
async fn parse_response<T: DeserializeOwned>(
    response: Response,
    action: &str,
) -> Result<T, anyhow::Error> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .with_context(|| format!("decoding the response to {action}"));
    }

    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    };
    Err(anyhow!("failed to {action} ({status}): {message}"))
}

impl TodoApi for HttpTodoApi {
    async fn fetch_todos(&self) -> Result<Vec<TodoRecord>, anyhow::Error> {
        let response = self
            .http_client
            .get(&self.todos_url)
            .send()
            .await
            .context("sending request to fetch todos")?;

        parse_response(response, "fetch todos").await
    }

    async fn create_todo(&self, new_todo: &NewTodo) -> Result<TodoRecord, anyhow::Error> {
        let response = self
            .http_client
            .post(&self.todos_url)
            .json(new_todo)
            .send()
            .await
            .context("sending request to create a todo")?;

        parse_response(response, "create a todo").await
    }

    async fn update_todo(
        &self,
        todo_id: Uuid,
        update: &UpdateTodo,
    ) -> Result<TodoRecord, anyhow::Error> {
        let response = self
            .http_client
            .put(self.todo_url(todo_id))
            .json(update)
            .send()
            .await
            .context("sending request to update a todo")?;

        parse_response(response, "update a todo").await
    }

    async fn delete_todo(&self, todo_id: Uuid) -> Result<DeletedTodo, anyhow::Error> {
        let response = self
            .http_client
            .delete(self.todo_url(todo_id))
            .send()
            .await
            .context("sending request to delete a todo")?;

        parse_response(response, "delete a todo").await
    }
}
