//! SMS gateway webhook signature verification.
//!
//! The gateway signs each delivery with HMAC-SHA256 over the raw request body
//! followed by the `X-Timestamp` header value, hex-encoded in `X-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC digest.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Header carrying the Unix timestamp (seconds) that was signed.
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Reasons a delivery fails verification. All map to 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature header")]
    MissingSignature,

    #[error("missing timestamp header")]
    MissingTimestamp,

    #[error("malformed timestamp")]
    InvalidTimestamp,

    #[error("timestamp outside tolerance window")]
    Stale,

    #[error("invalid signature")]
    Mismatch,
}

/// Compute the signature the gateway would send for `body` at `timestamp`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    hex::encode(mac_for(secret, timestamp, body).finalize().into_bytes())
}

/// Verify a webhook signature against the current time.
///
/// # Arguments
///
/// * `secret` - The shared webhook signing secret
/// * `timestamp` - The `X-Timestamp` header value, if present
/// * `signature` - The `X-Signature` header value, if present
/// * `body` - The raw request body, exactly as received
/// * `tolerance_secs` - Maximum allowed age (or clock skew) of the timestamp
pub fn verify_signature(
    secret: &str,
    timestamp: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    tolerance_secs: u64,
) -> Result<(), SignatureError> {
    verify_signature_at(
        secret,
        timestamp,
        signature,
        body,
        tolerance_secs,
        chrono::Utc::now().timestamp(),
    )
}

/// Same as [`verify_signature`] with an explicit notion of "now".
pub fn verify_signature_at(
    secret: &str,
    timestamp: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    tolerance_secs: u64,
    now: i64,
) -> Result<(), SignatureError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSignature)?;
    let timestamp = timestamp
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(SignatureError::MissingTimestamp)?;

    // Replay protection
    let sent_at: i64 = timestamp.parse().map_err(|_| {
        warn!(timestamp = %timestamp, "webhook_signature_invalid_timestamp");
        SignatureError::InvalidTimestamp
    })?;

    let age = now.abs_diff(sent_at);
    if age > tolerance_secs {
        warn!(
            webhook_time = sent_at,
            current_time = now,
            age_seconds = age,
            max_age_seconds = tolerance_secs,
            "webhook_signature_stale"
        );
        return Err(SignatureError::Stale);
    }

    let provided = hex::decode(signature).map_err(|_| {
        warn!(actual_length = signature.len(), "webhook_signature_not_hex");
        SignatureError::Mismatch
    })?;

    // verify_slice compares in constant time
    mac_for(secret, timestamp, body)
        .verify_slice(&provided)
        .map_err(|_| {
            warn!(actual_length = signature.len(), "webhook_signature_mismatch");
            SignatureError::Mismatch
        })
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac.update(timestamp.as_bytes());
    mac
}
