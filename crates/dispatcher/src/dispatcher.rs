//! BatchDispatcher - per-invocation fan-out of a message batch

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use contracts::{
    ContractError, DispatcherSettings, FailureReport, InvocationContext, Message, MessageHandlers,
    MessageId, MessageKind,
};

use crate::error::DispatcherError;
use crate::handlers::SimulatedHandlers;
use crate::metrics::{DispatcherMetrics, MetricsSnapshot};
use crate::route::{decode_message, process_payload};

const DEFAULT_MAX_CONCURRENCY: usize = 10;
const DEFAULT_DEADLINE_MARGIN: Duration = Duration::from_millis(500);

type Outcome = (usize, Result<(), ContractError>);

/// Handler tasks of one batch, indexed by batch position
struct InFlight {
    tasks: JoinSet<Outcome>,
    task_index: HashMap<task::Id, usize>,
    /// Kind of each spawned message not yet joined
    pending: Vec<Option<MessageKind>>,
}

impl InFlight {
    fn finish(&mut self, index: usize) -> Option<MessageKind> {
        self.pending.get_mut(index).and_then(Option::take)
    }

    fn finish_task(&mut self, id: task::Id) -> Option<MessageKind> {
        let index = self.task_index.get(&id).copied()?;
        self.finish(index)
    }

    fn pending_kinds(&self) -> impl Iterator<Item = &MessageKind> {
        self.pending.iter().flatten()
    }
}

/// Builder for creating a BatchDispatcher
pub struct DispatcherBuilder<H> {
    handlers: H,
    max_concurrency: usize,
    deadline_margin: Duration,
}

impl<H> DispatcherBuilder<H>
where
    H: MessageHandlers + Send + Sync + 'static,
{
    pub fn new(handlers: H) -> Self {
        Self {
            handlers,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deadline_margin: DEFAULT_DEADLINE_MARGIN,
        }
    }

    /// Messages processed at once (1 = sequential)
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Time reserved before the invocation deadline
    pub fn deadline_margin(mut self, margin: Duration) -> Self {
        self.deadline_margin = margin;
        self
    }

    /// Apply the `[dispatcher]` section of the settings
    pub fn settings(self, settings: &DispatcherSettings) -> Self {
        self.max_concurrency(settings.dispatcher.max_concurrency)
            .deadline_margin(settings.dispatcher.deadline_margin())
    }

    /// Build the dispatcher
    ///
    /// # Errors
    /// Rejects a zero concurrency limit.
    pub fn build(self) -> Result<BatchDispatcher<H>, DispatcherError> {
        if self.max_concurrency == 0 {
            return Err(DispatcherError::invalid_setting(
                "max_concurrency",
                "must be at least 1",
            ));
        }

        Ok(BatchDispatcher {
            handlers: Arc::new(self.handlers),
            max_concurrency: self.max_concurrency,
            deadline_margin: self.deadline_margin,
            metrics: Arc::new(DispatcherMetrics::new()),
        })
    }
}

/// Dispatches one batch per invocation and reports failed ids
///
/// Holds no per-batch state, so one instance serves every invocation of
/// a warm runtime.
pub struct BatchDispatcher<H> {
    handlers: Arc<H>,
    max_concurrency: usize,
    deadline_margin: Duration,
    metrics: Arc<DispatcherMetrics>,
}

impl<H> BatchDispatcher<H>
where
    H: MessageHandlers + Send + Sync + 'static,
{
    pub fn builder(handlers: H) -> DispatcherBuilder<H> {
        DispatcherBuilder::new(handlers)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Process a batch and return the ids the queue must redeliver
    ///
    /// Messages run concurrently up to the configured limit. Returns only
    /// after every message has finished or been abandoned at the deadline.
    /// An id is left out of the report only when its message was confirmed
    /// successful.
    #[instrument(
        name = "dispatch_batch",
        skip(self, batch, ctx),
        fields(request_id = %ctx.request_id, message_count = batch.len())
    )]
    pub async fn process_batch(&self, batch: Vec<Message>, ctx: &InvocationContext) -> FailureReport {
        let started = Instant::now();
        let deadline = ctx
            .remaining
            .map(|remaining| started + remaining.saturating_sub(self.deadline_margin));

        let total = batch.len();
        self.metrics.record_batch_started(total);

        let ids: Vec<MessageId> = batch.iter().map(|m| m.id.clone()).collect();
        let mut confirmed = vec![false; total];
        let mut in_flight = self.spawn_all(batch);

        loop {
            let joined = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, in_flight.tasks.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            warn!(
                                outstanding = in_flight.tasks.len(),
                                "Invocation deadline reached, abandoning in-flight messages"
                            );
                            self.metrics.record_timed_out(in_flight.pending_kinds());
                            in_flight.tasks.shutdown().await;
                            break;
                        }
                    }
                }
                None => in_flight.tasks.join_next().await,
            };

            match joined {
                None => break,
                Some(Ok((index, outcome))) => {
                    in_flight.finish(index);
                    // Failures are already logged and counted by process_payload
                    confirmed[index] = outcome.is_ok();
                }
                Some(Err(e)) => {
                    let kind = in_flight.finish_task(e.id());
                    self.metrics.record_panic(kind.as_ref());
                    error!(error = %e, message_type = ?kind, "Message task aborted or panicked");
                }
            }
        }

        let failed_ids = ids
            .into_iter()
            .zip(confirmed)
            .filter(|(_, ok)| !ok)
            .map(|(id, _)| id);
        let report = FailureReport::from_failed_ids(failed_ids);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_batch(total, report.len(), elapsed_ms);
        info!(
            succeeded = total - report.len(),
            total,
            failed = report.len(),
            elapsed_ms,
            "Batch processing complete"
        );

        report
    }

    /// Decode every message and spawn a handler task for each one that
    /// decoded; malformed messages are accounted for here and never spawned
    fn spawn_all(&self, batch: Vec<Message>) -> InFlight {
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut in_flight = InFlight {
            tasks: JoinSet::new(),
            task_index: HashMap::with_capacity(batch.len()),
            pending: vec![None; batch.len()],
        };

        for (index, message) in batch.into_iter().enumerate() {
            let Ok(payload) = decode_message(&message, &self.metrics) else {
                continue;
            };
            in_flight.pending[index] = Some(payload.kind.clone());

            let handlers = Arc::clone(&self.handlers);
            let metrics = Arc::clone(&self.metrics);
            let permits = Arc::clone(&permits);

            let handle = in_flight.tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (index, Err(ContractError::Other("dispatcher closed".into())));
                };
                let outcome =
                    process_payload(handlers.as_ref(), &message.id, &payload, &metrics).await;
                (index, outcome)
            });
            in_flight.task_index.insert(handle.id(), index);
        }

        in_flight
    }
}

/// Convenience function to create a dispatcher with simulated handlers
/// from settings
pub fn create_dispatcher(
    settings: &DispatcherSettings,
) -> Result<BatchDispatcher<SimulatedHandlers>, DispatcherError> {
    BatchDispatcher::builder(SimulatedHandlers::new(settings.handlers.clone()))
        .settings(settings)
        .build()
}
