use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use todo_notes::{SharedData, app_env, app_router, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    logging::setup_logging_and_tracing(logging::init_env_filter()?, logging::exporters_from_env()?);
    if !dotenv_loaded {
        info!("No .env file found, reading configuration from the environment only");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set to the todo database URL", app_env::DB_URL))?;
    let pool = db::connect_sqlx(&db_url)
        .await
        .context("connecting to the todo database")?;
    db::run_migrations(&pool)
        .await
        .context("migrating the todo database")?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });

    let port = app_env::listen_port();
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding to port {port}"))?;
    info!("Server running on port {port}");

    axum::serve(listener, app_router(shared_data))
        .await
        .context("serving the todo API")
}
