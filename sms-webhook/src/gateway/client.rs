//! Authenticated HTTP client for registering and deleting webhooks.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use super::types::{RegisterWebhookRequest, WebhookEvent, WebhookRegistration};
use crate::config::GatewayCredentials;

/// Errors from a gateway round trip. None of them are retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Thin wrapper over `reqwest::Client` carrying the base URL and basic-auth
/// credentials.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    credentials: GatewayCredentials,
}

impl GatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: GatewayCredentials,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a webhook subscription for `event` pointing at `callback_url`.
    pub async fn register(
        &self,
        callback_url: &str,
        event: WebhookEvent,
    ) -> Result<WebhookRegistration, GatewayError> {
        info!(callback_url = %callback_url, event = %event, "gateway_webhook_registering");

        let response = self
            .http
            .post(format!("{}/webhooks", self.base_url))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(&RegisterWebhookRequest {
                url: callback_url,
                event,
            })
            .send()
            .await?;

        let registration: WebhookRegistration = check_status(response, "register")
            .await?
            .json()
            .await?;

        info!(webhook_id = %registration.id, "gateway_webhook_registered");

        Ok(registration)
    }

    /// Delete the webhook subscription with the given id.
    pub async fn deregister(&self, id: &str) -> Result<(), GatewayError> {
        info!(webhook_id = %id, "gateway_webhook_deregistering");

        let response = self
            .http
            .delete(format!("{}/webhooks/{}", self.base_url, id))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        check_status(response, "deregister").await?;

        info!(webhook_id = %id, "gateway_webhook_deregistered");

        Ok(())
    }
}

async fn check_status(response: Response, operation: &str) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(200).collect();
    error!(
        operation = operation,
        status_code = status.as_u16(),
        body_preview = %preview,
        "gateway_request_rejected"
    );

    Err(GatewayError::Status { status, body })
}
