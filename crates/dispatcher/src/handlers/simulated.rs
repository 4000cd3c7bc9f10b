//! SimulatedHandlers - stand-in downstream routines
//!
//! Each routine logs its input and sleeps for the configured delay in
//! place of real downstream work.

use std::time::Duration;

use contracts::{ContractError, HandlerDelays, MessageHandlers, MessageKind, PayloadData};
use tracing::{info, instrument};

/// Default `MessageHandlers` used by the processor binaries
#[derive(Debug, Clone, Default)]
pub struct SimulatedHandlers {
    delays: HandlerDelays,
}

impl SimulatedHandlers {
    pub fn new(delays: HandlerDelays) -> Self {
        Self { delays }
    }

    pub fn delays(&self) -> &HandlerDelays {
        &self.delays
    }

    async fn simulate_processing(&self, kind: &MessageKind) {
        let delay = self.delays.delay_for(kind);
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
    }
}

impl MessageHandlers for SimulatedHandlers {
    #[instrument(name = "order_created_handler", skip_all)]
    async fn order_created(&self, data: &PayloadData) -> Result<(), ContractError> {
        info!(data = ?data, "Processing order created event");
        self.simulate_processing(&MessageKind::OrderCreated).await;
        info!("Order processed successfully");
        Ok(())
    }

    #[instrument(name = "user_registered_handler", skip_all)]
    async fn user_registered(&self, data: &PayloadData) -> Result<(), ContractError> {
        info!(data = ?data, "Processing user registration event");
        self.simulate_processing(&MessageKind::UserRegistered).await;
        info!("User registration processed successfully");
        Ok(())
    }

    #[instrument(name = "notification_handler", skip_all)]
    async fn notification(&self, data: &PayloadData) -> Result<(), ContractError> {
        info!(data = ?data, "Processing notification event");
        self.simulate_processing(&MessageKind::Notification).await;
        info!("Notification sent successfully");
        Ok(())
    }

    #[instrument(name = "test_message_handler", skip_all)]
    async fn test_message(&self, data: &PayloadData) -> Result<(), ContractError> {
        info!(data = ?data, "Test message received");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delays() {
        let handlers = SimulatedHandlers::default();
        let data = PayloadData::new();

        let started = Instant::now();
        handlers.user_registered(&data).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(150));

        let started = Instant::now();
        handlers.test_message(&data).await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_zero_delays_complete_immediately() {
        let handlers = SimulatedHandlers::new(HandlerDelays::none());
        let data = PayloadData::new();

        assert!(handlers.order_created(&data).await.is_ok());
        assert!(handlers.notification(&data).await.is_ok());
    }
}
