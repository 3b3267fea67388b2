use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::{Resource, runtime};
use std::env;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

const SERVICE_NAME: &str = "todo-notes";

/// Exporters shipping spans and metrics to an OpenTelemetry collector
pub struct OtelExporters {
    pub tracer: Tracer,
    pub meter: SdkMeterProvider,
}

fn service_resource() -> Resource {
    Resource::new([KeyValue::new("service.name", SERVICE_NAME)])
}

/// Opens the span for one API request. The span continues the caller's trace when the
/// request carries W3C trace context headers.
fn request_span(request: &Request<Body>) -> Span {
    let span = debug_span!(
        "todo_api_request",
        method = request.method().as_str(),
        path = request.uri().path(),
        response_status = field::Empty,
        latency_ms = field::Empty,
    );

    let caller_context = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(caller_context);

    span
}

fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("response_status", field::display(response.status()));
    span.record("latency_ms", latency.as_millis() as u64);
    debug!("request processing complete");
}

/// Traces every request handled by `router`
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response),
    )
}

/// Builds OpenTelemetry exporters if both [app_env::OTEL_SPAN_EXPORT_URL] and
/// [app_env::OTEL_METRIC_EXPORT_URL] are set. Telemetry export is skipped otherwise.
pub fn exporters_from_env() -> anyhow::Result<Option<OtelExporters>> {
    let (Ok(traces_endpoint), Ok(metrics_endpoint)) = (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) else {
        return Ok(None);
    };

    init_exporters(&traces_endpoint, &metrics_endpoint).map(Some)
}

/// Starts background exporters sending spans and metrics over gRPC, typically to a collector
/// sidecar on http://localhost:4317
pub fn init_exporters(traces_endpoint: &str, metrics_endpoint: &str) -> anyhow::Result<OtelExporters> {
    let span_exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(traces_endpoint)
        .build()
        .context("building the span exporter")?;
    let metric_exporter = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(metrics_endpoint)
        .build()
        .context("building the metric exporter")?;

    let tracer = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(span_exporter, runtime::Tokio)
        .with_resource(service_resource())
        .build()
        .tracer(SERVICE_NAME);
    let meter = SdkMeterProvider::builder()
        .with_reader(PeriodicReader::builder(metric_exporter, runtime::Tokio).build())
        .with_resource(service_resource())
        .build();

    Ok(OtelExporters { tracer, meter })
}

/// Per-module log filter read from [app_env::LOG_LEVEL], "info" when unset
pub fn init_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .context("parsing the log filter")
}

/// Installs the global subscriber. Stdout gets JSON logs filtered by `env_filter`, while
/// OpenTelemetry (when configured) receives everything from "debug" up.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let (span_layer, metrics_layer) = match otel_exporters {
        Some(OtelExporters { tracer, meter }) => (
            Some(OpenTelemetryLayer::new(tracer)),
            Some(MetricsLayer::new(meter)),
        ),
        None => (None, None),
    };

    registry()
        .with(LevelFilter::DEBUG)
        .with(span_layer)
        .with(metrics_layer)
        .with(tracing_subscriber::fmt::layer().json().with_filter(env_filter))
        .init();
}
