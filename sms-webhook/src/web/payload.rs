//! Typed `sms:received` webhook payload.
//!
//! Two body shapes are accepted:
//! - the flat event, `{"sim_index", "sender", "message", "received_at"}`
//! - the gateway's delivery envelope, `{"deviceId", "event", "id", "webhookId", "payload"}`,
//!   whose `payload` carries the event under the gateway's camelCase names

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::WebhookEvent;

/// An inbound SMS as delivered by the gateway.
///
/// Field names follow this service's snake_case contract; the gateway's own
/// camelCase names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingSmsEvent {
    /// SIM slot the message arrived on
    #[serde(alias = "simNumber")]
    pub sim_index: i64,

    /// Sender phone number
    #[serde(alias = "phoneNumber")]
    pub sender: String,

    pub message: String,

    #[serde(alias = "receivedAt")]
    pub received_at: DateTime<FixedOffset>,

    /// Gateway-side message id, when the gateway includes one
    #[serde(default, alias = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl IncomingSmsEvent {
    /// Parse a raw request body, flat or enveloped. Every required field must
    /// be present and well typed.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;

        if value.get("payload").is_some() {
            let envelope: DeliveryEnvelope = serde_json::from_value(value)?;
            Ok(envelope.payload)
        } else {
            serde_json::from_value(value)
        }
    }
}

/// The gateway's wrapper around a delivered event.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryEnvelope {
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Only `sms:received` deserializes
    pub event: WebhookEvent,

    pub id: String,

    #[serde(rename = "webhookId")]
    pub webhook_id: String,

    pub payload: IncomingSmsEvent,
}

impl fmt::Display for IncomingSmsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SIM {} | From: {} | Received at: {} | Message: {}",
            self.sim_index,
            self.sender,
            self.received_at.to_rfc3339(),
            self.message
        )
    }
}
