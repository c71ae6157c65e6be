//! Webhook endpoint handlers.
//!
//! Each delivery is handled on its own: verify the signature, parse the body,
//! log a summary. Nothing is shared between requests except read-only config.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use super::error::WebhookRejection;
use super::payload::IncomingSmsEvent;
use super::signature::{verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// SMS Received Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// `sms:received` webhook endpoint.
///
/// 1. Verifies the HMAC signature (if a secret is configured)
/// 2. Parses the body into an [`IncomingSmsEvent`]
/// 3. Logs a human-readable summary
pub async fn sms_received_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookRejection> {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        has_timestamp = timestamp.is_some(),
        "webhook_received"
    );

    match state.config.signing_secret() {
        Some(secret) => {
            if let Err(e) = verify_signature(
                secret,
                timestamp,
                signature,
                &body,
                state.config.signature_tolerance_secs,
            ) {
                warn!(reason = %e, "webhook_signature_invalid");
                return Err(e.into());
            }
        }
        None => warn!("webhook_signature_not_verified"),
    }

    let event = IncomingSmsEvent::from_slice(&body).map_err(|e| {
        warn!(error = %e, "webhook_payload_invalid");
        WebhookRejection::from(e)
    })?;

    info!(
        sim = event.sim_index,
        from = %event.sender,
        text = %event.message,
        received_at = %event.received_at.to_rfc3339(),
        message_id = ?event.message_id,
        summary = %event,
        "sms_received"
    );

    Ok(Json(WebhookResponse { status: "ok" }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
