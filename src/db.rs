use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Opens a connection pool against the todo database
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
}

/// Brings the database schema up to date with the migrations in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!("Applying database migrations");
    sqlx::migrate!().run(pool).await
}
