use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;
use serde::Serialize;
use tracing::error;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{ToSchema, openapi};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::domain::todo::driving_ports::TodoError;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToSchema)]
pub struct BasicErrorResponse {
    /// Human-readable description of the failure
    #[schema(example = "Todo not found")]
    pub error: String,
    /// Machine-readable failure code
    #[schema(example = "not_found")]
    pub error_code: String,
    pub extra_info: Option<ExtraInfo>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error: impl Into<String>) -> Self {
        BasicErrorResponse {
            error: error.into(),
            error_code: error_code.to_owned(),
            extra_info: None,
        }
    }

    fn with_extra_info(mut self, extra_info: ExtraInfo) -> Self {
        self.extra_info = Some(extra_info);
        self
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

/// Response type that turns failures from the todo domain into [BasicErrorResponse]s
pub struct TodoErrorResponse(pub TodoError);

impl IntoResponse for TodoErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            TodoError::MissingText => (
                StatusCode::BAD_REQUEST,
                Json(BasicErrorResponse::new(
                    "invalid_input",
                    "Todo text is required.",
                )),
            )
                .into_response(),

            TodoError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(BasicErrorResponse::new("not_found", "Todo not found")),
            )
                .into_response(),

            TodoError::PortError(cause) => {
                error!("Todo store failure: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(BasicErrorResponse::new(
                        "internal_error",
                        "Could not access data to complete your request",
                    )),
                )
                    .into_response()
            }
        }
    }
}

impl From<TodoError> for TodoErrorResponse {
    fn from(value: TodoError) -> Self {
        Self(value)
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(
                BasicErrorResponse::new("invalid_input", "Submitted data was invalid.")
                    .with_extra_info(ExtraInfo::ValidationIssues(ValidationErrorSchema(self.0))),
            ),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Response type for path identifiers that aren't valid todo IDs
pub struct InvalidIdResponse {
    raw_id: String,
}

impl IntoResponse for InvalidIdResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(
                BasicErrorResponse::new("invalid_id", "The todo ID was malformed.")
                    .with_extra_info(ExtraInfo::Message(format!(
                        "\"{}\" is not a valid UUID",
                        self.raw_id
                    ))),
            ),
        )
            .into_response()
    }
}

/// Parses a todo ID taken from a request path
pub fn parse_todo_id(raw_id: &str) -> Result<Uuid, InvalidIdResponse> {
    Uuid::parse_str(raw_id).map_err(|_| InvalidIdResponse {
        raw_id: raw_id.to_owned(),
    })
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(
                BasicErrorResponse::new(
                    "invalid_json",
                    "The passed request body contained malformed or unreadable JSON.",
                )
                .with_extra_info(ExtraInfo::Message(self.parse_problem)),
            ),
        )
            .into_response()
    }
}
