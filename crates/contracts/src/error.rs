//! Layered error definitions
//!
//! Categorized by source: payload / handler / config / secrets

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Message Errors =====
    /// Message body did not decode into a payload
    #[error("malformed payload in message '{message_id}': {message}")]
    MalformedPayload { message_id: String, message: String },

    /// A dispatched handler routine failed
    #[error("handler for '{kind}' failed: {message}")]
    HandlerFailure { kind: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Secret Errors =====
    /// Secret source lookup failed
    #[error("failed to fetch secret '{name}': {message}")]
    SecretFetch { name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create malformed payload error
    pub fn malformed_payload(message_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message_id: message_id.into(),
            message: message.into(),
        }
    }

    /// Create handler failure error
    pub fn handler_failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerFailure {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create secret fetch error
    pub fn secret_fetch(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretFetch {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened before any handler ran
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }
}
