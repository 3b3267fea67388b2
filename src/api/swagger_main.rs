use crate::dto;
use utoipa::OpenApi;
use utoipa::openapi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Todo Notes API",
    description = "A to-do list with notes and assignees"
))]
struct TodoNotesApi;

/// Combines the route documentation from [api][crate::api] with the shared [dto] schemas
fn api_documentation() -> openapi::OpenApi {
    let mut api_docs = TodoNotesApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo::TodoApi::openapi());

    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_documentation())
}
