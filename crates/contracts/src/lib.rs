//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Delivery Model
//! - A `Message` is consumed once per delivery attempt and never mutated
//! - A `FailureReport` is the only channel back to the queue

mod error;
mod handler;
mod invocation;
mod message;
mod report;
mod settings;

pub use error::*;
pub use handler::{LocalMessageHandlers, MessageHandlers};
pub use invocation::InvocationContext;
pub use message::*;
pub use report::*;
pub use settings::*;
