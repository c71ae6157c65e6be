//! Client for the SMS gateway's webhook-management API.
//!
//! Only two calls are needed: create a webhook subscription at startup and
//! delete it again at shutdown.

pub mod client;
pub mod types;

pub use client::{GatewayClient, GatewayError};
pub use types::{RegisterWebhookRequest, WebhookEvent, WebhookRegistration};
