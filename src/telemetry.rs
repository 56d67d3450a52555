//! Logging and trace export setup

use opentelemetry::{KeyValue, trace::TracerProvider as _};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, logs::SdkLoggerProvider, trace::SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{AirWatchError, Result, VERSION, config::LoggingConfig};

const SERVICE_NAME: &str = "airwatch";

/// Keeps the OpenTelemetry providers alive; flushes them on drop.
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {err}");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down logger provider: {err}");
            }
        }
    }
}

/// `RUST_LOG` takes precedence over the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{SERVICE_NAME}={level},tower_http={level},warn",
            level = config.level
        ))
    })
}

fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, VERSION))
        .build()
}

fn otlp_providers(endpoint: &str) -> Result<(SdkTracerProvider, SdkLoggerProvider)> {
    let endpoint = endpoint.trim_end_matches('/');

    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/traces"))
        .build()
        .map_err(|e| AirWatchError::telemetry(format!("span exporter: {e}")))?;
    let log_exporter = LogExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/logs"))
        .build()
        .map_err(|e| AirWatchError::telemetry(format!("log exporter: {e}")))?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource())
        .build();
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource())
        .build();

    Ok((tracer_provider, logger_provider))
}

/// Install the global subscriber: fmt output (pretty or JSON), filtered by
/// level, plus OTLP span and log export when an endpoint is configured.
pub fn init(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let fmt_layer = if config.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let mut guard = TelemetryGuard::default();
    let (trace_layer, log_layer) = match &config.otlp_endpoint {
        Some(endpoint) => {
            let (tracer_provider, logger_provider) = otlp_providers(endpoint)?;
            let tracer = tracer_provider.tracer(SERVICE_NAME);
            let trace_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            let log_layer = OpenTelemetryTracingBridge::new(&logger_provider);
            guard.tracer_provider = Some(tracer_provider);
            guard.logger_provider = Some(logger_provider);
            (Some(trace_layer), Some(log_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(config))
        .with(trace_layer)
        .with(log_layer)
        .try_init()
        .map_err(|e| AirWatchError::telemetry(e.to_string()))?;

    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::info!(endpoint = %endpoint, "exporting traces and logs over OTLP");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_uses_configured_level() {
        // SAFETY: Test environment, clearing an override only
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..LoggingConfig::default()
        };
        let filter = env_filter(&config).to_string();
        assert!(filter.contains("airwatch=debug"));
    }

    #[test]
    fn test_guard_without_providers_drops_cleanly() {
        drop(TelemetryGuard::default());
    }
}
