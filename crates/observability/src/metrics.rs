//! Batch processing metrics
//!
//! Facade recorders for message and batch outcomes, plus an in-memory
//! aggregator for printing run summaries.

use metrics::{counter, histogram};
use std::fmt;

/// Terminal state of one message in one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Handler completed, or the type was unrecognized
    Succeeded,
    /// Body did not decode
    Malformed,
    /// Handler returned an error or panicked
    HandlerFailed,
    /// Abandoned at the invocation deadline
    TimedOut,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Malformed => "malformed",
            Self::HandlerFailed => "handler_failed",
            Self::TimedOut => "timed_out",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Record one message outcome
///
/// `kind` must be a bounded label (see `MessageKind::metric_label`).
pub fn record_message_outcome(kind: &'static str, status: MessageStatus) {
    counter!(
        "batch_processor_messages_total",
        "kind" => kind,
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record a completed batch
pub fn record_batch(total: usize, failed: usize, duration_ms: f64) {
    counter!("batch_processor_batches_total").increment(1);
    histogram!("batch_processor_batch_size").record(total as f64);
    histogram!("batch_processor_batch_duration_ms").record(duration_ms);

    if failed > 0 {
        counter!("batch_processor_partial_failures_total").increment(1);
        counter!("batch_processor_failed_items_total").increment(failed as u64);
    }
}

/// Record a secret cache lookup
pub fn record_secret_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("batch_processor_secret_lookups_total", "result" => result).increment(1);
}

/// Batch statistics aggregator
///
/// Aggregates per-batch results in memory for summaries.
#[derive(Debug, Clone, Default)]
pub struct BatchStatsAggregator {
    /// Batches processed
    pub total_batches: u64,

    /// Messages seen across all batches
    pub total_messages: u64,

    /// Messages reported failed
    pub total_failed: u64,

    /// Batches with at least one failure
    pub batches_with_failures: u64,

    /// Batch wall time (ms)
    pub duration_stats: RunningStats,

    /// Messages per batch
    pub size_stats: RunningStats,
}

impl BatchStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch result in
    pub fn update(&mut self, total: usize, failed: usize, duration_ms: f64) {
        self.total_batches += 1;
        self.total_messages += total as u64;
        self.total_failed += failed as u64;
        if failed > 0 {
            self.batches_with_failures += 1;
        }
        self.duration_stats.push(duration_ms);
        self.size_stats.push(total as f64);
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_batches: self.total_batches,
            total_messages: self.total_messages,
            total_failed: self.total_failed,
            batches_with_failures: self.batches_with_failures,
            failure_rate: if self.total_messages > 0 {
                self.total_failed as f64 / self.total_messages as f64 * 100.0
            } else {
                0.0
            },
            duration_ms: StatsSummary::from(&self.duration_stats),
            batch_size: StatsSummary::from(&self.size_stats),
        }
    }
}

/// Aggregated run summary
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total_batches: u64,
    pub total_messages: u64,
    pub total_failed: u64,
    pub batches_with_failures: u64,
    pub failure_rate: f64,
    pub duration_ms: StatsSummary,
    pub batch_size: StatsSummary,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Batch Summary ===")?;
        writeln!(f, "Batches: {}", self.total_batches)?;
        writeln!(f, "Messages: {}", self.total_messages)?;
        writeln!(
            f,
            "Failed messages: {} ({:.2}%)",
            self.total_failed, self.failure_rate
        )?;
        writeln!(f, "Batches with failures: {}", self.batches_with_failures)?;
        writeln!(f, "Batch duration (ms): {}", self.duration_ms)?;
        writeln!(f, "Batch size: {}", self.batch_size)
    }
}

/// Summary of a `RunningStats`
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = BatchStatsAggregator::new();
        aggregator.update(3, 1, 12.0);
        aggregator.update(5, 0, 8.0);

        let summary = aggregator.summary();
        assert_eq!(summary.total_batches, 2);
        assert_eq!(summary.total_messages, 8);
        assert_eq!(summary.total_failed, 1);
        assert_eq!(summary.batches_with_failures, 1);
        assert!((summary.failure_rate - 12.5).abs() < 1e-10);
        assert!((summary.duration_ms.mean - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = BatchStatsAggregator::new();
        aggregator.update(4, 1, 20.0);

        let output = aggregator.summary().to_string();
        assert!(output.contains("Messages: 4"));
        assert!(output.contains("25.00%"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchStatsAggregator::new().summary();
        assert_eq!(summary.failure_rate, 0.0);
        assert_eq!(summary.duration_ms.to_string(), "N/A");
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: calls must be harmless no-ops
        record_message_outcome("test_message", MessageStatus::Succeeded);
        record_batch(2, 1, 3.5);
        record_secret_lookup(true);
        assert!(!MessageStatus::TimedOut.is_success());
    }
}
