//! Per-message decode and routing

use tracing::{error, info, instrument, warn};

use contracts::{ContractError, Message, MessageHandlers, MessageKind, Payload};

use crate::metrics::DispatcherMetrics;

/// Route a decoded payload to its handler routine
///
/// Unrecognized kinds are acknowledged without work so the queue does
/// not redeliver them forever.
pub async fn route<H: MessageHandlers>(handlers: &H, payload: &Payload) -> Result<(), ContractError> {
    match &payload.kind {
        MessageKind::OrderCreated => handlers.order_created(&payload.data).await,
        MessageKind::UserRegistered => handlers.user_registered(&payload.data).await,
        MessageKind::Notification => handlers.notification(&payload.data).await,
        MessageKind::TestMessage => handlers.test_message(&payload.data).await,
        MessageKind::Unrecognized(tag) => {
            warn!(message_type = %tag, "Unknown message type, acknowledging without processing");
            Ok(())
        }
    }
}

/// Decode one message, accounting for a malformed body
///
/// A message that fails here never reaches a handler.
pub(crate) fn decode_message(
    message: &Message,
    metrics: &DispatcherMetrics,
) -> Result<Payload, ContractError> {
    info!(message_id = %message.id, "Processing message");

    message.decode().inspect_err(|e| {
        error!(message_id = %message.id, error = %e, "Failed to parse message");
        metrics.record_failure(None, e);
    })
}

/// Route a decoded payload and account for the outcome
///
/// Returns `Ok` only when the message may be deleted from the queue.
#[instrument(
    name = "process_message",
    skip_all,
    fields(message_id = %message_id, message_type = %payload.kind)
)]
pub(crate) async fn process_payload<H: MessageHandlers>(
    handlers: &H,
    message_id: &str,
    payload: &Payload,
    metrics: &DispatcherMetrics,
) -> Result<(), ContractError> {
    info!(
        correlation_id = ?payload.correlation_id,
        timestamp = ?payload.timestamp,
        "Message payload"
    );

    match route(handlers, payload).await {
        Ok(()) => {
            metrics.record_success(&payload.kind);
            info!("Successfully processed message");
            Ok(())
        }
        Err(e) => {
            metrics.record_failure(Some(&payload.kind), &e);
            error!(error = %e, "Failed to process message");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PayloadData;
    use std::sync::Mutex;

    /// Records which routine ran
    #[derive(Default)]
    struct RecordingHandlers {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingHandlers {
        fn called(&self, name: &'static str) -> Result<(), ContractError> {
            self.calls.lock().unwrap().push(name);
            Ok(())
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MessageHandlers for RecordingHandlers {
        async fn order_created(&self, _data: &PayloadData) -> Result<(), ContractError> {
            self.called("order_created")
        }

        async fn user_registered(&self, _data: &PayloadData) -> Result<(), ContractError> {
            self.called("user_registered")
        }

        async fn notification(&self, _data: &PayloadData) -> Result<(), ContractError> {
            self.called("notification")
        }

        async fn test_message(&self, _data: &PayloadData) -> Result<(), ContractError> {
            self.called("test_message")
        }
    }

    #[tokio::test]
    async fn test_route_each_recognized_kind_once() {
        let handlers = RecordingHandlers::default();
        for tag in ["ORDER_CREATED", "USER_REGISTERED", "NOTIFICATION", "TEST_MESSAGE"] {
            let payload = Payload::new(MessageKind::parse(tag), PayloadData::new());
            route(&handlers, &payload).await.unwrap();
        }

        assert_eq!(
            handlers.calls(),
            vec!["order_created", "user_registered", "notification", "test_message"]
        );
    }

    #[tokio::test]
    async fn test_route_unrecognized_is_noop_success() {
        let handlers = RecordingHandlers::default();
        let payload = Payload::new(MessageKind::parse("UNKNOWN_X"), PayloadData::new());

        assert!(route(&handlers, &payload).await.is_ok());
        assert!(handlers.calls().is_empty());
    }

    #[test]
    fn test_decode_message_counts_malformed() {
        let metrics = DispatcherMetrics::new();

        let err = decode_message(&Message::new("2", "not-json"), &metrics).unwrap_err();

        assert!(err.is_malformed());
        assert_eq!(metrics.snapshot().malformed, 1);
    }

    #[tokio::test]
    async fn test_process_payload_without_data_is_routed() {
        let handlers = RecordingHandlers::default();
        let metrics = DispatcherMetrics::new();
        let payload = decode_message(&Message::new("3", r#"{"type":"TEST_MESSAGE"}"#), &metrics).unwrap();

        process_payload(&handlers, "3", &payload, &metrics).await.unwrap();

        assert_eq!(handlers.calls(), vec!["test_message"]);
        assert_eq!(metrics.snapshot().succeeded, 1);
    }
}
