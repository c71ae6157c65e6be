//! Configuration module for environment variable parsing.
//!
//! All settings come from the environment. `main` loads a `.env` file first,
//! so local runs can keep credentials out of the shell history.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;
use url::Url;

/// Default cloud endpoint of the SMS gateway's third-party API.
pub const DEFAULT_API_URL: &str = "https://api.sms-gate.app/3rdparty/v1";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the gateway API (`SMS_GATE_API_URL`)
    pub api_url: String,

    /// Gateway basic-auth username
    pub api_username: Option<String>,

    /// Gateway basic-auth password
    pub api_password: Option<String>,

    /// Shared secret used to sign webhook deliveries. `None` disables verification.
    pub webhook_secret: Option<String>,

    /// Externally reachable URL of `/webhook/sms-received`
    pub webhook_url: Option<String>,

    pub ssl_cert: Option<PathBuf>,
    pub ssl_key: Option<PathBuf>,

    /// Maximum allowed distance between `X-Timestamp` and now, in seconds
    pub signature_tolerance_secs: u64,

    /// Port for the web server to listen on
    pub port: u16,

    /// Timeout for inbound requests and gateway calls, in milliseconds
    pub request_timeout_ms: u64,
}

/// Gateway credentials, present only when both halves are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCredentials {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails only when a URL-valued variable does not parse.
    pub fn from_env() -> Result<Self> {
        let api_url = non_empty("SMS_GATE_API_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).with_context(|| format!("SMS_GATE_API_URL is not a URL: {api_url}"))?;

        let webhook_url = non_empty("WEBHOOK_URL").map(|url| url.trim().to_string());
        if let Some(url) = &webhook_url {
            Url::parse(url).with_context(|| format!("WEBHOOK_URL is not a URL: {url}"))?;
        }

        let ssl_cert = non_empty("SSL_CERT_PATH").map(PathBuf::from);
        let ssl_key = non_empty("SSL_KEY_PATH").map(PathBuf::from);
        let default_port = if ssl_cert.is_some() && ssl_key.is_some() {
            8443
        } else {
            8080
        };

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_username: non_empty("SMS_GATE_API_USERNAME"),
            api_password: non_empty("SMS_GATE_API_PASSWORD"),
            webhook_secret: non_empty("WEBHOOK_SECRET"),
            webhook_url,
            ssl_cert,
            ssl_key,
            signature_tolerance_secs: parse_or("SIGNATURE_TOLERANCE_SECS", 300),
            port: parse_or("PORT", default_port),
            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 10_000),
        })
    }

    /// Credentials for the gateway API, if both username and password are set.
    pub fn credentials(&self) -> Option<GatewayCredentials> {
        match (&self.api_username, &self.api_password) {
            (Some(username), Some(password)) => Some(GatewayCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Certificate and key paths, only when both are configured.
    pub fn tls(&self) -> Option<(PathBuf, PathBuf)> {
        match (&self.ssl_cert, &self.ssl_key) {
            (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
            _ => None,
        }
    }

    /// The webhook signing secret, unless it is unset or blank.
    ///
    /// `None` means deliveries are accepted without verification.
    pub fn signing_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Read an environment variable, treating blank values as unset.
///
/// The value is returned as-is: a secret with surrounding whitespace is still
/// that exact secret.
fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    let Some(raw) = non_empty(name) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}
