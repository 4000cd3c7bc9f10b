//! # Dispatcher
//!
//! Batch message dispatch.
//!
//! Responsibilities:
//! - Decode each message of a batch independently
//! - Route by `MessageKind` to one `MessageHandlers` routine
//! - Isolate failures per message and report only failed ids
//! - Treat everything unfinished at the invocation deadline as failed

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod route;

pub use contracts::{FailureReport, InvocationContext, Message, MessageHandlers};
pub use dispatcher::{create_dispatcher, BatchDispatcher, DispatcherBuilder};
pub use error::DispatcherError;
pub use handlers::SimulatedHandlers;
pub use metrics::{DispatcherMetrics, MetricsSnapshot};
pub use route::route;
