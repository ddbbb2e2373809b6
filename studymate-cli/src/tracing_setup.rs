//! Logging and optional span export for the studymate CLI
//!
//! Usage:
//!   studymate serve                       # request spans and handler events at info
//!   studymate --debug serve               # also repository debug events and SQL timings
//!   studymate --otel serve                # ship spans over OTLP (`telemetry` feature)
//!   RUST_LOG=studymate_server=trace ...   # RUST_LOG always wins over --debug
//!
//! OTLP export reads OTEL_EXPORTER_OTLP_ENDPOINT (default http://localhost:4317)
//! and OTEL_SERVICE_NAME (default studymate-api).

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter: our crates at info, sqlx statement logging kept quiet
const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// `--debug` filter: our crates and request spans at debug, sqlx at info
const DEBUG_FILTER: &str = "info,studymate=debug,studymate_server=debug,tower_http=debug,sqlx=info";

fn default_directives(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Flushes exported spans when dropped. Hold it for the life of `main`.
#[must_use]
pub struct TracingGuard {
    #[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
    exporting: bool,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        if self.exporting {
            opentelemetry::global::shutdown_tracer_provider();
        }
    }
}

#[cfg(feature = "telemetry")]
fn otlp_layer<S>(
) -> Result<tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_owned());
    let service =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "studymate-api".to_owned());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("OTLP exporter for {}: {}", endpoint, e))?;

    let provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![
            KeyValue::new("service.name", service),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]))
        .build();

    let tracer = provider.tracer("studymate");
    // Global provider keeps the batch exporter running until TracingGuard drops
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(debug: bool, otel: bool) -> Result<TracingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(debug).compact());

    #[cfg(feature = "telemetry")]
    let registry = registry.with(if otel { Some(otlp_layer()?) } else { None });

    registry.try_init().map_err(|err| anyhow!(err))?;

    let exporting = cfg!(feature = "telemetry") && otel;
    if otel && !exporting {
        tracing::warn!("--otel ignored, built without the `telemetry` feature");
    }

    Ok(TracingGuard { exporting })
}
