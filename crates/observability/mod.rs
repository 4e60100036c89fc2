mod config;
mod layer;
mod loki;
mod shipper;

use anyhow::Result;
use config::ObservabilityConfig;
use layer::LogShipLayer;
use loki::LokiPushSink;
use shipper::LogShipper;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the file writer flushing; hold it for the lifetime of the process.
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber: console output, an optional daily rolling
/// file under `LOG_DIR` and optional Loki shipping. Must run inside a tokio
/// runtime because the Loki shipper spawns its push task.
pub fn init_observability(component: &str) -> Result<ObservabilityGuard> {
    let mut config = ObservabilityConfig::from_env(component);

    let loki_layer = match config.loki.as_ref() {
        Some(loki) => match LokiPushSink::new(loki, config.service_context.clone()) {
            Ok(sink) => {
                let shipper = LogShipper::new(Arc::new(sink));
                Some(
                    LogShipLayer::new(shipper, loki.min_level).with_filter(
                        tracing_subscriber::filter::LevelFilter::from_level(loki.min_level),
                    ),
                )
            }
            Err(err) => {
                config
                    .warnings
                    .push(format!("Loki transport disabled (failed to build sink: {err})"));
                None
            }
        },
        None => None,
    };

    let (file_layer, file_guard) = match config.log_dir.as_ref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{component}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let loki_enabled = loki_layer.is_some();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(loki_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            service = %config.service_context.service_name,
            environment = %config.service_context.environment,
            component = %config.service_context.component,
            warning = %warning,
            "Observability config warning"
        );
    }

    info!(
        service = %config.service_context.service_name,
        environment = %config.service_context.environment,
        component = %config.service_context.component,
        loki_enabled,
        file_logging = config.log_dir.is_some(),
        "Observability initialised"
    );

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}
