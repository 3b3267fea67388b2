use axum::Router;
use axum::extract::State;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod app_env;
pub mod client;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

/// State shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

pub type AppState = State<Arc<SharedData>>;

/// Assembles the full HTTP application: the todo API under "/api/todos", its documentation,
/// permissive CORS for the browser client and request tracing
pub fn app_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .nest("/api/todos", api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation())
        .layer(CorsLayer::permissive());

    logging::attach_tracing_http(router).with_state(shared_data)
}
