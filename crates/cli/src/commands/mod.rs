//! Command implementations.

mod run;
mod validate;

pub use run::run_batches;
pub use validate::run_validate;
