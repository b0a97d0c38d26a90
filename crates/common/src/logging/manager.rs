//! Logging initialization and shutdown management.

use tracing::*;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter,
    Layer,
};

use super::types::{FileLoggingConfig, LoggerConfig, StdoutConfig};

/// Initializes the logging subsystem with the provided config.
pub fn init(config: LoggerConfig) {
    let stdout_sub = stdout_layer(&config.stdout_config);

    // Build optional file logging layer
    let file_layer = config.file_logging_config.as_ref().map(file_layer);

    tracing_subscriber::registry()
        .with(stdout_sub)
        .with(file_layer)
        .init();

    info!(
        service_name = %config.service_name,
        service_version = ?config.service_version,
        "logging initialized"
    );
}

/// Shuts down the logging subsystem.
///
/// File output is written synchronously, so there is nothing to flush. This only marks the end
/// of the log stream.
pub fn finalize() {
    info!("shutting down logging");
}

/// Default filter is `INFO`, overridable via `RUST_LOG`.
pub(super) fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy()
}

pub(super) fn stdout_layer<S>(config: &StdoutConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if config.json_format {
        layer()
            .json()
            .with_span_events(config.fmt_span.clone())
            .with_filter(env_filter())
            .boxed()
    } else {
        layer()
            .compact()
            .with_span_events(config.fmt_span.clone())
            .with_filter(env_filter())
            .boxed()
    }
}

pub(super) fn file_layer<S>(config: &FileLoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file_appender = RollingFileAppender::new(
        config.rotation.clone(),
        &config.directory,
        &config.file_name_prefix,
    );

    if config.json_format {
        layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false) // No color codes in files
            .with_filter(env_filter())
            .boxed()
    } else {
        layer()
            .compact()
            .with_writer(file_appender)
            .with_ansi(false) // No color codes in files
            .with_filter(env_filter())
            .boxed()
    }
}
