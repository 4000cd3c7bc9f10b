//! Dispatcher metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ContractError, MessageKind};
use observability::{record_message_outcome, MessageStatus};

/// Label for messages whose body never decoded to a kind
pub const UNDECODED_LABEL: &str = "undecoded";

/// Lifetime counters of one dispatcher
///
/// Every update is mirrored to the `metrics` facade.
#[derive(Debug, Default)]
pub struct DispatcherMetrics {
    batches: AtomicU64,
    messages: AtomicU64,
    succeeded: AtomicU64,
    unrecognized: AtomicU64,
    malformed: AtomicU64,
    handler_failures: AtomicU64,
    timed_out: AtomicU64,
}

impl DispatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch of `size` messages was accepted
    pub fn record_batch_started(&self, size: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.messages.fetch_add(size as u64, Ordering::Relaxed);
    }

    /// A message completed successfully
    pub fn record_success(&self, kind: &MessageKind) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        if !kind.is_recognized() {
            self.unrecognized.fetch_add(1, Ordering::Relaxed);
        }
        record_message_outcome(kind.metric_label(), MessageStatus::Succeeded);
    }

    /// A message failed while decoding or inside its handler
    pub fn record_failure(&self, kind: Option<&MessageKind>, error: &ContractError) {
        let label = kind.map_or(UNDECODED_LABEL, MessageKind::metric_label);
        if error.is_malformed() {
            self.malformed.fetch_add(1, Ordering::Relaxed);
            record_message_outcome(label, MessageStatus::Malformed);
        } else {
            self.handler_failures.fetch_add(1, Ordering::Relaxed);
            record_message_outcome(label, MessageStatus::HandlerFailed);
        }
    }

    /// A handler task for a message of `kind` panicked
    pub fn record_panic(&self, kind: Option<&MessageKind>) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
        let label = kind.map_or(UNDECODED_LABEL, MessageKind::metric_label);
        record_message_outcome(label, MessageStatus::HandlerFailed);
    }

    /// Messages of these kinds were still in flight at the deadline
    pub fn record_timed_out<'a>(&self, kinds: impl IntoIterator<Item = &'a MessageKind>) {
        for kind in kinds {
            self.timed_out.fetch_add(1, Ordering::Relaxed);
            record_message_outcome(kind.metric_label(), MessageStatus::TimedOut);
        }
    }

    pub fn failed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
            + self.handler_failures.load(Ordering::Relaxed)
            + self.timed_out.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            unrecognized: self.unrecognized.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `DispatcherMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub messages: u64,
    pub succeeded: u64,
    /// Subset of `succeeded` whose type was not recognized
    pub unrecognized: u64,
    pub malformed: u64,
    pub handler_failures: u64,
    pub timed_out: u64,
}

impl MetricsSnapshot {
    pub fn failed(&self) -> u64 {
        self.malformed + self.handler_failures + self.timed_out
    }
}
