//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Optional OpenTelemetry trace export
//! - Prometheus metrics with a small HTTP endpoint and health probes

pub mod metrics;
pub mod tracing_mod;

use anyhow::Result;

use crate::observability_config::ObservabilityConfig;

pub use self::metrics::{
    is_ready, mark_ready, record_candidate_generation, record_cell_check, record_error_metrics,
    record_max_cell_update, record_request_metrics, record_startup_metrics,
    record_telegram_message, record_user_action, UserAction,
};
pub use self::tracing_mod::{generation_span, telegram_span};

/// Initialize the complete observability stack with custom configuration
pub async fn init_observability_with_config(config: ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    tracing_mod::init_tracing_with_config(&config)?;

    if config.enable_metrics_export {
        let metrics_handle = self::metrics::init_metrics_with_config(&config)?;
        self::metrics::start_metrics_server(metrics_handle, config.metrics_port).await?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        otlp_endpoint = ?config.otlp_endpoint,
        metrics_port = %config.metrics_port,
        "Observability stack initialized successfully"
    );
    Ok(())
}
