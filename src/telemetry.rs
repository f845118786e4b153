use opentelemetry::trace::TraceError;
use opentelemetry_otlp::WithExportConfig;
use tracing::{Subscriber, subscriber::set_global_default};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use opentelemetry::KeyValue;
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};

use opentelemetry_semantic_conventions::resource::SERVICE_NAME;

/// Builds the bunyan subscriber. Spans are also shipped over OTLP when an
/// endpoint is given; that path must run inside a tokio runtime.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    otlp_endpoint: Option<String>,
    sink: Sink,
) -> Result<impl Subscriber + Send + Sync, TraceError>
where
    Sink: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Sync + Send + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let telemetry_layer = match otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()?;

            let resource = Resource::new(vec![
                KeyValue::new(SERVICE_NAME, name.clone()),
                KeyValue::new("component", "frontend"),
            ]);

            let tracer_provider = sdktrace::TracerProvider::builder()
                .with_batch_exporter(exporter, runtime::Tokio)
                .with_resource(resource)
                .build();

            let tracer =
                opentelemetry::trace::TracerProvider::tracer(&tracer_provider, "shortfront-tracer");
            opentelemetry::global::set_tracer_provider(tracer_provider);

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    Ok(Registry::default()
        .with(env_filter)
        .with(telemetry_layer)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink)))
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) {
    LogTracer::init().expect("Failed to initialize env log tracer");
    set_global_default(subscriber).expect("failed to create subscriber");
}

/// Flushes spans still buffered for export.
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

/// Calls [`shutdown`] when dropped, so early returns flush spans too.
#[must_use = "spans are flushed when the guard is dropped"]
pub struct TelemetryGuard {
    flush: fn(),
}

impl TelemetryGuard {
    pub fn new() -> Self {
        Self { flush: shutdown }
    }
}

impl Default for TelemetryGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        (self.flush)();
    }
}
