//! InvocationContext - per-invocation metadata from the event source

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Request identity and remaining time budget of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Event-source request identifier (log correlation only)
    pub request_id: String,

    /// Time left before the invocation is killed (`None` = unbounded)
    pub remaining: Option<Duration>,
}

impl InvocationContext {
    /// Context without a time budget
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            remaining: None,
        }
    }

    /// Set the remaining time budget
    pub fn with_remaining(mut self, remaining: Duration) -> Self {
        self.remaining = Some(remaining);
        self
    }

    /// Build from an absolute deadline in epoch milliseconds.
    ///
    /// A deadline of `0` means the event source gave none. A deadline
    /// already in the past yields a zero budget.
    pub fn from_deadline_ms(request_id: impl Into<String>, deadline_ms: u64, now: SystemTime) -> Self {
        let ctx = Self::new(request_id);
        if deadline_ms == 0 {
            return ctx;
        }

        let now_ms = now
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        ctx.with_remaining(Duration::from_millis(deadline_ms.saturating_sub(now_ms)))
    }
}
