//! Settings validation
//!
//! Rules:
//! - environment is non-empty
//! - max_concurrency > 0
//! - every handler delay <= MAX_HANDLER_DELAY_MS

use contracts::{ContractError, DispatcherSettings};

/// Upper bound for a simulated handler delay
pub const MAX_HANDLER_DELAY_MS: u64 = 60_000;

/// Validate settings, returning the first violation found
pub fn validate(settings: &DispatcherSettings) -> Result<(), ContractError> {
    validate_environment(settings)?;
    validate_dispatch(settings)?;
    validate_handler_delays(settings)?;
    Ok(())
}

fn validate_environment(settings: &DispatcherSettings) -> Result<(), ContractError> {
    if settings.environment.trim().is_empty() {
        return Err(ContractError::config_validation(
            "environment",
            "environment must not be empty",
        ));
    }
    Ok(())
}

fn validate_dispatch(settings: &DispatcherSettings) -> Result<(), ContractError> {
    if settings.dispatcher.max_concurrency == 0 {
        return Err(ContractError::config_validation(
            "dispatcher.max_concurrency",
            "max_concurrency must be > 0",
        ));
    }
    Ok(())
}

fn validate_handler_delays(settings: &DispatcherSettings) -> Result<(), ContractError> {
    let handlers = &settings.handlers;
    let delays = [
        ("handlers.order_created_delay_ms", handlers.order_created_delay_ms),
        ("handlers.user_registered_delay_ms", handlers.user_registered_delay_ms),
        ("handlers.notification_delay_ms", handlers.notification_delay_ms),
    ];

    for (field, value) in delays {
        if value > MAX_HANDLER_DELAY_MS {
            return Err(ContractError::config_validation(
                field,
                format!("delay must be <= {MAX_HANDLER_DELAY_MS}ms, got {value}"),
            ));
        }
    }
    Ok(())
}
