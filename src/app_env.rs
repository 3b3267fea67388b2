/// URL for accessing the PostgreSQL database that stores todo records
pub const DB_URL: &str = "DATABASE_URL";
/// Port the API server listens on. Defaults to [DEFAULT_PORT] if unset or unparseable.
pub const PORT: &str = "PORT";
/// Log level configuration for the application. For formatting info, see [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_PORT: u16 = 5000;

/// Reads [PORT] from the environment, falling back to [DEFAULT_PORT]
pub fn listen_port() -> u16 {
    std::env::var(PORT)
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// URL for accessing the PostgreSQL server during integration tests (should not contain a database name in the path)
pub const TEST_DB_URL: &str = "TEST_DB_URL";
