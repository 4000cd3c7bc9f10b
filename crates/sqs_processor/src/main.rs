//! # SQS Processor
//!
//! Function runtime entry point. Settings come from the optional
//! `BATCH_PROCESSOR_CONFIG` file plus environment overrides; one dispatcher
//! is built per warm runtime and reused by every invocation.
//!
//! The invocation deadline reported by the runtime bounds each batch, so
//! messages still running near it are returned as failures rather than
//! lost with the whole invocation.

mod event;
mod handler;

use std::path::PathBuf;
use std::sync::Arc;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

use config_loader::ConfigLoader;
use observability::ObservabilityConfig;

/// Optional settings file path
const ENV_CONFIG_PATH: &str = "BATCH_PROCESSOR_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Error> {
    observability::init_with_config(ObservabilityConfig::function_runtime())?;

    let config_path = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
    let settings = ConfigLoader::load_with_env(config_path.as_deref())?;
    let dispatcher = Arc::new(dispatcher::create_dispatcher(&settings)?);
    let environment: Arc<str> = Arc::from(settings.environment.as_str());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        max_concurrency = settings.dispatcher.max_concurrency,
        deadline_margin_ms = settings.dispatcher.deadline_margin_ms,
        "SQS processor starting"
    );

    run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let dispatcher = Arc::clone(&dispatcher);
        let environment = Arc::clone(&environment);
        async move { handler::handle_event(dispatcher.as_ref(), &environment, event).await }
    }))
    .await
}
