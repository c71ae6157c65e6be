//! Webhook registration lifecycle.
//!
//! ```text
//! NotRegistered --register()--> Registered --deregister()--> Deregistered
//! ```
//!
//! The registration returned by the gateway is owned here and handed back,
//! unchanged, to the single deregister call at shutdown.

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::gateway::{GatewayClient, WebhookEvent, WebhookRegistration};
use crate::Config;

/// Where the process is in its registration lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    NotRegistered,
    Registered(WebhookRegistration),
    Deregistered,
}

/// Owns the gateway subscription for the duration of the run.
pub struct WebhookLifecycle {
    gateway: Option<GatewayClient>,
    callback_url: Option<String>,
    state: RegistrationState,
}

impl WebhookLifecycle {
    /// A lifecycle that registers `callback_url` through `gateway`.
    pub fn new(gateway: GatewayClient, callback_url: impl Into<String>) -> Self {
        Self {
            gateway: Some(gateway),
            callback_url: Some(callback_url.into()),
            state: RegistrationState::NotRegistered,
        }
    }

    /// A lifecycle that never talks to the gateway.
    pub fn disabled() -> Self {
        Self {
            gateway: None,
            callback_url: None,
            state: RegistrationState::NotRegistered,
        }
    }

    /// Build from configuration. Registration is skipped unless credentials
    /// and `WEBHOOK_URL` are all set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (Some(credentials), Some(callback_url)) = (config.credentials(), &config.webhook_url)
        else {
            warn!(
                credentials_configured = config.credentials().is_some(),
                webhook_url_configured = config.webhook_url.is_some(),
                "webhook_registration_disabled"
            );
            return Ok(Self::disabled());
        };

        let gateway = GatewayClient::new(&config.api_url, credentials, config.request_timeout())
            .context("Failed to build gateway client")?;

        Ok(Self::new(gateway, callback_url.clone()))
    }

    pub fn state(&self) -> &RegistrationState {
        &self.state
    }

    /// Register the webhook. Valid once, from `NotRegistered`.
    ///
    /// Returns `None` when registration is disabled. Any gateway failure is
    /// returned to the caller, which is expected to abort startup.
    pub async fn register(&mut self) -> Result<Option<&WebhookRegistration>> {
        if self.state != RegistrationState::NotRegistered {
            bail!("webhook registration already attempted");
        }

        let (Some(gateway), Some(callback_url)) = (&self.gateway, &self.callback_url) else {
            info!("webhook_registration_skipped");
            return Ok(None);
        };

        let registration = gateway
            .register(callback_url, WebhookEvent::SmsReceived)
            .await
            .with_context(|| format!("Failed to register webhook at {}", gateway.base_url()))?;

        info!(
            webhook_id = %registration.id,
            url = %registration.url,
            event = %registration.event_type,
            "webhook_registered"
        );

        self.state = RegistrationState::Registered(registration);

        Ok(self.registration())
    }

    /// The live registration, if any.
    pub fn registration(&self) -> Option<&WebhookRegistration> {
        match &self.state {
            RegistrationState::Registered(registration) => Some(registration),
            _ => None,
        }
    }

    /// Best-effort deregistration. Failures are logged and swallowed.
    ///
    /// Only acts from `Registered`; the stored registration is consumed, so a
    /// second call is a no-op.
    pub async fn deregister(&mut self) {
        let registration = match std::mem::replace(&mut self.state, RegistrationState::Deregistered) {
            RegistrationState::Registered(registration) => registration,
            previous => {
                self.state = previous;
                info!("webhook_deregistration_skipped");
                return;
            }
        };

        let Some(gateway) = &self.gateway else {
            return;
        };

        match gateway.deregister(&registration.id).await {
            Ok(()) => info!(webhook_id = %registration.id, "webhook_deregistered"),
            Err(e) => error!(
                webhook_id = %registration.id,
                error = %e,
                "webhook_deregistration_failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_lifecycle_never_registers() {
        let mut lifecycle = WebhookLifecycle::disabled();

        assert!(lifecycle.register().await.unwrap().is_none());
        assert_eq!(lifecycle.state(), &RegistrationState::NotRegistered);

        lifecycle.deregister().await;
        assert_eq!(lifecycle.state(), &RegistrationState::NotRegistered);
    }

    #[test]
    fn test_from_config_without_credentials_is_disabled() {
        let config = Config {
            api_url: crate::config::DEFAULT_API_URL.to_string(),
            api_username: Some("user".to_string()),
            api_password: None,
            webhook_secret: None,
            webhook_url: Some("https://example.com/webhook/sms-received".to_string()),
            ssl_cert: None,
            ssl_key: None,
            signature_tolerance_secs: 300,
            port: 8080,
            request_timeout_ms: 1_000,
        };

        let lifecycle = WebhookLifecycle::from_config(&config).unwrap();

        assert!(lifecycle.gateway.is_none());
        assert_eq!(lifecycle.state(), &RegistrationState::NotRegistered);
    }
}
