//! Wire types for the gateway's `/webhooks` endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event types a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "sms:received")]
    SmsReceived,
}

impl WebhookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::SmsReceived => "sms:received",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterWebhookRequest<'a> {
    pub url: &'a str,
    pub event: WebhookEvent,
}

/// A webhook subscription as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    pub id: String,
    pub url: String,
    #[serde(rename = "event")]
    pub event_type: WebhookEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_body() {
        let body = RegisterWebhookRequest {
            url: "https://example.com/webhook/sms-received",
            event: WebhookEvent::SmsReceived,
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/webhook/sms-received",
                "event": "sms:received"
            })
        );
    }

    #[test]
    fn test_registration_ignores_extra_fields() {
        let registration: WebhookRegistration = serde_json::from_str(
            r#"{"id":"abc123","url":"https://example.com/hook","event":"sms:received","deviceId":null}"#,
        )
        .unwrap();

        assert_eq!(registration.id, "abc123");
        assert_eq!(registration.event_type, WebhookEvent::SmsReceived);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result: Result<WebhookRegistration, _> = serde_json::from_str(
            r#"{"id":"abc123","url":"https://example.com/hook","event":"sms:sent"}"#,
        );

        assert!(result.is_err());
    }
}
