//! Conversions between queue event types and dispatcher contracts

use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent};
use tracing::error;

use contracts::{FailureReport, Message};

/// Build a batch from a queue event
///
/// A record without a body is kept with empty text so it fails decoding
/// and is redelivered. A record without an id cannot be reported back, so
/// it is skipped and the queue deletes it unprocessed.
pub fn batch_from_event(event: SqsEvent) -> Vec<Message> {
    event
        .records
        .into_iter()
        .filter_map(|record| match record.message_id {
            Some(id) => Some(Message::new(id, record.body.unwrap_or_default())),
            None => {
                error!(
                    event_source_arn = ?record.event_source_arn,
                    "Record without messageId cannot be reported; it will be deleted from the queue without processing"
                );
                None
            }
        })
        .collect()
}

/// Convert a failure report into the queue's batch response
pub fn batch_response(report: FailureReport) -> SqsBatchResponse {
    SqsBatchResponse {
        batch_item_failures: report
            .batch_item_failures
            .into_iter()
            .map(|failure| BatchItemFailure {
                item_identifier: failure.item_identifier,
            })
            .collect(),
    }
}
