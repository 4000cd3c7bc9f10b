//! # Observability
//!
//! Tracing initialisation and `metrics` facade recorders.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON / Pretty / Compact)
//! - Message and batch outcome counters
//! - In-process run statistics for local summaries
//!
//! ## Usage
//!
//! ```ignore
//! observability::init()?;
//!
//! let report = dispatcher.process_batch(batch, &ctx).await;
//! observability::record_batch(total, report.len(), elapsed_ms);
//! ```
//!
//! No exporter is installed here: recorders are no-ops until the host
//! process installs one.

pub mod metrics;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_batch, record_message_outcome, record_secret_lookup, BatchStatsAggregator,
    BatchSummary, MessageStatus, RunningStats, StatsSummary,
};

/// Initialise tracing with the default (JSON) configuration
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Default level when `RUST_LOG` is unset
    pub default_log_level: String,
    /// ANSI colour codes in output
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            ansi: true,
        }
    }
}

impl ObservabilityConfig {
    /// Settings for a function runtime whose log sink is line-oriented
    /// and does not render colour
    pub fn function_runtime() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            ansi: false,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    #[default]
    Json,
    /// Human-readable
    Pretty,
    /// Single-line compact
    Compact,
}

/// Initialise with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_ansi(config.ansi)
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_ansi(config.ansi).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_ansi(config.ansi).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        default_log_level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}
