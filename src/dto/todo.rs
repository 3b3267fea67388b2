use crate::domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// DTO for creating a new todo via the API
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewTodo {
    #[validate(required, length(min = 1))]
    #[schema(example = "Buy milk")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Two percent, not skim")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Unassigned")]
    pub assignee: Option<String>,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            text: value.text.unwrap_or_default(),
            notes: value.notes,
            assignee: value.assignee,
        }
    }
}

/// DTO for partially updating a todo via the API. Omitted fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Buy oat milk")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = true)]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Robin")]
    pub assignee: Option<String>,
}

impl From<UpdateTodo> for domain::todo::TodoUpdate {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::TodoUpdate {
            text: value.text,
            notes: value.notes,
            completed: value.completed,
            assignee: value.assignee,
        }
    }
}

/// DTO for a todo returned from the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    #[schema(example = "1f0c9d4e-8a2b-4c5d-9e6f-7a8b9c0d1e2f")]
    pub id: Uuid,
    #[schema(example = "Buy milk")]
    pub text: String,
    #[schema(example = "")]
    pub notes: String,
    #[schema(example = false)]
    pub completed: bool,
    #[schema(example = "Unassigned")]
    pub assignee: String,
    pub created_at: DateTime<Utc>,
}

impl From<domain::todo::TodoRecord> for TodoRecord {
    fn from(value: domain::todo::TodoRecord) -> Self {
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

/// DTO confirming a todo was deleted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DeletedTodo {
    #[schema(example = "Todo deleted successfully")]
    pub message: String,
}

impl Default for DeletedTodo {
    fn default() -> Self {
        DeletedTodo {
            message: "Todo deleted successfully".to_owned(),
        }
    }
}
