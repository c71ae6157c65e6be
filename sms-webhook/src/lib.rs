//! SMSGate webhooks - receiver for SMS gateway `sms:received` deliveries.
//!
//! This library provides the pieces wired together by the
//! `smsgate-webhooks` binary:
//! - `gateway`: register/deregister the webhook with the SMS gateway API
//! - `web`: the signed webhook endpoint
//! - `lifecycle`: ties registration to process start and stop
//!
//! ## Flow
//!
//! ```text
//! start → register → serve /webhook/sms-received → shutdown → deregister
//! ```

pub mod config;
pub mod gateway;
pub mod lifecycle;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use gateway::{GatewayClient, GatewayError, WebhookEvent, WebhookRegistration};
pub use lifecycle::{RegistrationState, WebhookLifecycle};
pub use web::{router, AppState, IncomingSmsEvent};
