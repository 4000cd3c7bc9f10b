//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use config_loader::ConfigLoader;
use contracts::{DispatcherSettings, FailureReport, HandlerDelays, InvocationContext, MessageHandlers};
use dispatcher::{create_dispatcher, BatchDispatcher};
use observability::BatchStatsAggregator;

use crate::batch_file::load_batch;
use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_batches(args: &RunArgs) -> Result<()> {
    let settings = build_settings(args)?;
    let dispatcher = create_dispatcher(&settings).context("Failed to create dispatcher")?;

    info!(
        environment = %settings.environment,
        max_concurrency = settings.dispatcher.max_concurrency,
        batches = args.batch.len(),
        "Dispatcher ready"
    );

    tokio::select! {
        result = dispatch_all(&dispatcher, args) => {
            let stats = result?;
            if args.summary {
                eprintln!("{}", stats.summary());
            }
        }
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, abandoning remaining batches");
        }
    }

    let snapshot = dispatcher.metrics();
    info!(
        messages = snapshot.messages,
        succeeded = snapshot.succeeded,
        failed = snapshot.failed(),
        unrecognized = snapshot.unrecognized,
        "Batch dispatch finished"
    );
    Ok(())
}

/// Load settings and apply CLI overrides
fn build_settings(args: &RunArgs) -> Result<DispatcherSettings> {
    let mut settings = ConfigLoader::load_with_env(args.config.as_deref())
        .context("Failed to load settings")?;

    if let Some(max_concurrency) = args.max_concurrency {
        info!(max_concurrency, "Overriding concurrency limit from CLI");
        settings.dispatcher.max_concurrency = max_concurrency;
    }
    if args.no_delay {
        settings.handlers = HandlerDelays::none();
    }

    ConfigLoader::validate(&settings).context("Invalid settings after CLI overrides")?;
    Ok(settings)
}

/// Dispatch every batch file in order, printing one report line each
async fn dispatch_all<H>(dispatcher: &BatchDispatcher<H>, args: &RunArgs) -> Result<BatchStatsAggregator>
where
    H: MessageHandlers + Send + Sync + 'static,
{
    let mut stats = BatchStatsAggregator::new();

    for (n, path) in args.batch.iter().enumerate() {
        let batch = load_batch(path)?;
        let total = batch.len();
        let ctx = invocation_context(&args.request_id, n + 1, args.timeout_ms);

        let started = Instant::now();
        let report = dispatcher.process_batch(batch, &ctx).await;
        stats.update(total, report.len(), started.elapsed().as_secs_f64() * 1000.0);

        print_report(&report)?;
    }

    Ok(stats)
}

fn invocation_context(prefix: &str, sequence: usize, timeout_ms: u64) -> InvocationContext {
    let ctx = InvocationContext::new(format!("{prefix}-{sequence}"));
    if timeout_ms == 0 {
        ctx
    } else {
        ctx.with_remaining(Duration::from_millis(timeout_ms))
    }
}

fn print_report(report: &FailureReport) -> Result<()> {
    let json = serde_json::to_string(report).context("Failed to serialize failure report")?;
    println!("{json}");
    Ok(())
}

/// Resolve on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
