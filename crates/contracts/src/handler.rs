//! MessageHandlers trait - dispatcher outbound interface
//!
//! One routine per recognized `MessageKind`. The dispatcher matches the
//! kind exhaustively, so adding a kind forces a new routine here.

use crate::{ContractError, PayloadData};

/// Downstream effect routines
///
/// Implementations only report success or failure; any error fails the
/// single message being handled.
#[trait_variant::make(MessageHandlers: Send)]
pub trait LocalMessageHandlers {
    /// `ORDER_CREATED`
    async fn order_created(&self, data: &PayloadData) -> Result<(), ContractError>;

    /// `USER_REGISTERED`
    async fn user_registered(&self, data: &PayloadData) -> Result<(), ContractError>;

    /// `NOTIFICATION`
    async fn notification(&self, data: &PayloadData) -> Result<(), ContractError>;

    /// `TEST_MESSAGE`
    async fn test_message(&self, data: &PayloadData) -> Result<(), ContractError>;
}
