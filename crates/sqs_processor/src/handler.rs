//! Invocation handler

use std::time::SystemTime;

use aws_lambda_events::event::sqs::{SqsBatchResponse, SqsEvent};
use lambda_runtime::{Error, LambdaEvent};
use tracing::info;

use contracts::{InvocationContext, MessageHandlers};
use dispatcher::BatchDispatcher;

use crate::event::{batch_from_event, batch_response};

/// Handle one queue event
///
/// Never fails the invocation for message-level problems: those are
/// returned as batch item failures.
pub async fn handle_event<H>(
    dispatcher: &BatchDispatcher<H>,
    environment: &str,
    event: LambdaEvent<SqsEvent>,
) -> Result<SqsBatchResponse, Error>
where
    H: MessageHandlers + Send + Sync + 'static,
{
    let (sqs_event, lambda_ctx) = event.into_parts();
    let ctx = InvocationContext::from_deadline_ms(
        lambda_ctx.request_id,
        lambda_ctx.deadline,
        SystemTime::now(),
    );

    info!(
        message_count = sqs_event.records.len(),
        request_id = %ctx.request_id,
        environment,
        "SQS processor invoked"
    );

    let batch = batch_from_event(sqs_event);
    let report = dispatcher.process_batch(batch, &ctx).await;

    Ok(batch_response(report))
}
