//! Dispatcher settings contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::MessageKind;

/// Top-level processor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherSettings {
    /// Deployment environment name (logged on every invocation)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Batch execution settings
    #[serde(default)]
    pub dispatcher: DispatchConfig,

    /// Simulated downstream work per handler
    #[serde(default)]
    pub handlers: HandlerDelays,
}

fn default_environment() -> String {
    "unknown".to_string()
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            dispatcher: DispatchConfig::default(),
            handlers: HandlerDelays::default(),
        }
    }
}

/// Batch execution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Messages processed at once (1 = sequential)
    pub max_concurrency: usize,

    /// Reserved before the invocation deadline to build and return the report
    pub deadline_margin_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            deadline_margin_ms: 500,
        }
    }
}

impl DispatchConfig {
    pub fn deadline_margin(&self) -> Duration {
        Duration::from_millis(self.deadline_margin_ms)
    }
}

/// Simulated processing time per handler, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerDelays {
    pub order_created_delay_ms: u64,
    pub user_registered_delay_ms: u64,
    pub notification_delay_ms: u64,
}

impl Default for HandlerDelays {
    fn default() -> Self {
        Self {
            order_created_delay_ms: 100,
            user_registered_delay_ms: 150,
            notification_delay_ms: 50,
        }
    }
}

impl HandlerDelays {
    /// No simulated latency anywhere
    pub fn none() -> Self {
        Self {
            order_created_delay_ms: 0,
            user_registered_delay_ms: 0,
            notification_delay_ms: 0,
        }
    }

    /// Delay for a kind; kinds without downstream work get zero
    pub fn delay_for(&self, kind: &MessageKind) -> Duration {
        let ms = match kind {
            MessageKind::OrderCreated => self.order_created_delay_ms,
            MessageKind::UserRegistered => self.user_registered_delay_ms,
            MessageKind::Notification => self.notification_delay_ms,
            MessageKind::TestMessage | MessageKind::Unrecognized(_) => 0,
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DispatcherSettings::default();
        assert_eq!(settings.environment, "unknown");
        assert_eq!(settings.dispatcher.max_concurrency, 10);
        assert_eq!(settings.dispatcher.deadline_margin(), Duration::from_millis(500));
        assert_eq!(
            settings.handlers.delay_for(&MessageKind::UserRegistered),
            Duration::from_millis(150)
        );
        assert_eq!(settings.handlers.delay_for(&MessageKind::TestMessage), Duration::ZERO);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let settings: DispatcherSettings =
            serde_json::from_str(r#"{"dispatcher":{"max_concurrency":3}}"#).unwrap();
        assert_eq!(settings.dispatcher.max_concurrency, 3);
        assert_eq!(settings.dispatcher.deadline_margin_ms, 500);
        assert_eq!(settings.handlers, HandlerDelays::default());
    }
}
