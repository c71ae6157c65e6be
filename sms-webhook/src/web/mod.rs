//! Web server module for the inbound `sms:received` webhook.
//!
//! Routes:
//! - `GET /health`
//! - `POST /webhook/sms-received`

pub mod error;
pub mod handlers;
pub mod payload;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use error::{ErrorResponse, WebhookRejection};
pub use handlers::{health, sms_received_webhook, AppState, HealthResponse, WebhookResponse};
pub use payload::{DeliveryEnvelope, IncomingSmsEvent};
pub use signature::{
    sign, verify_signature, verify_signature_at,
    SignatureError, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

/// Path the gateway delivers `sms:received` events to.
pub const SMS_RECEIVED_PATH: &str = "/webhook/sms-received";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/health", get(health))
        .route(SMS_RECEIVED_PATH, post(sms_received_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
