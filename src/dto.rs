use utoipa::OpenApi;

pub mod todo;

pub use todo::*;

/// Schemas for wire types that are shared by every route, merged into the API documentation
#[derive(OpenApi)]
#[openapi(components(schemas(
    todo::NewTodo,
    todo::UpdateTodo,
    todo::TodoRecord,
    todo::DeletedTodo,
    crate::routing_utils::BasicErrorResponse,
    crate::routing_utils::ExtraInfo,
    crate::routing_utils::ValidationErrorSchema,
)))]
pub struct OpenApiSchemas;
