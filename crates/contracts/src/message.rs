//! Message / Payload - queue input contracts
//!
//! A `Message` carries untrusted JSON text. Decoding yields a `Payload`
//! whose `type` tag is resolved into the closed `MessageKind` set.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::ContractError;

/// Queue-assigned message identifier
pub type MessageId = String;

/// Free-form payload data handed to handler routines
pub type PayloadData = Map<String, Value>;

/// A single queue message as delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier reported back on failure
    pub id: MessageId,

    /// Serialized payload text
    pub body: String,
}

impl Message {
    /// Create a message
    pub fn new(id: impl Into<MessageId>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    /// Decode the body into a `Payload`
    ///
    /// # Errors
    /// Returns `MalformedPayload` when the body is not JSON, lacks a string
    /// `type`, or carries a `data` that is neither an object nor null.
    pub fn decode(&self) -> Result<Payload, ContractError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ContractError::malformed_payload(&self.id, e.to_string()))
    }
}

/// Decoded message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Routing tag
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Handler input; missing or null decodes as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: PayloadData,

    /// Producer timestamp (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Cross-service correlation identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl Payload {
    /// Create a payload without timestamp or correlation id
    pub fn new(kind: MessageKind, data: PayloadData) -> Self {
        Self {
            kind,
            data,
            timestamp: None,
            correlation_id: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<PayloadData, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PayloadData>::deserialize(deserializer)?.unwrap_or_default())
}

/// Message type tag
///
/// Tags outside the recognized set are kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    OrderCreated,
    UserRegistered,
    Notification,
    TestMessage,
    Unrecognized(String),
}

impl MessageKind {
    /// Resolve a wire tag (exact, case-sensitive)
    pub fn parse(tag: &str) -> Self {
        match tag {
            "ORDER_CREATED" => Self::OrderCreated,
            "USER_REGISTERED" => Self::UserRegistered,
            "NOTIFICATION" => Self::Notification,
            "TEST_MESSAGE" => Self::TestMessage,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Wire tag
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderCreated => "ORDER_CREATED",
            Self::UserRegistered => "USER_REGISTERED",
            Self::Notification => "NOTIFICATION",
            Self::TestMessage => "TEST_MESSAGE",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Bounded label for metrics; every unknown tag collapses to one value
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::UserRegistered => "user_registered",
            Self::Notification => "notification",
            Self::TestMessage => "test_message",
            Self::Unrecognized(_) => "unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for MessageKind {
    fn from(tag: String) -> Self {
        match Self::parse(&tag) {
            Self::Unrecognized(_) => Self::Unrecognized(tag),
            known => known,
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
