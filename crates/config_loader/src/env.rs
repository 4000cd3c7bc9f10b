//! Environment variable overrides
//!
//! Applied after file parsing and before validation.

use std::str::FromStr;

use contracts::{ContractError, DispatcherSettings};
use tracing::debug;

/// Deployment environment name
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
/// Concurrency limit
pub const ENV_MAX_CONCURRENCY: &str = "BATCH_MAX_CONCURRENCY";
/// Deadline margin in milliseconds
pub const ENV_DEADLINE_MARGIN_MS: &str = "BATCH_DEADLINE_MARGIN_MS";

/// Apply overrides read through `lookup`
///
/// `lookup` abstracts the process environment so tests need not mutate it.
pub fn apply_overrides<F>(settings: &mut DispatcherSettings, lookup: F) -> Result<(), ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(environment) = lookup(ENV_ENVIRONMENT) {
        debug!(environment = %environment, "Overriding environment");
        settings.environment = environment;
    }
    if let Some(value) = lookup(ENV_MAX_CONCURRENCY) {
        settings.dispatcher.max_concurrency = parse_number(ENV_MAX_CONCURRENCY, &value)?;
    }
    if let Some(value) = lookup(ENV_DEADLINE_MARGIN_MS) {
        settings.dispatcher.deadline_margin_ms = parse_number(ENV_DEADLINE_MARGIN_MS, &value)?;
    }
    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ContractError> {
    value
        .trim()
        .parse()
        .map_err(|_| ContractError::config_parse(format!("{key} must be a non-negative integer, got '{value}'")))
}
