//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Per-message failures never surface here; they end up in the
/// `FailureReport`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Invalid dispatcher setting
    #[error("invalid dispatcher setting '{field}': {message}")]
    InvalidSetting { field: String, message: String },

    /// Contract error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create an invalid setting error
    pub fn invalid_setting(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field: field.into(),
            message: message.into(),
        }
    }
}
