//! Rejections returned by the webhook endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::signature::SignatureError;

/// Why a webhook delivery was refused.
#[derive(Debug, Error)]
pub enum WebhookRejection {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub detail: String,
}

impl WebhookRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookRejection::Signature(_) => StatusCode::UNAUTHORIZED,
            WebhookRejection::Payload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = match self {
            WebhookRejection::Signature(_) => "unauthorized",
            WebhookRejection::Payload(_) => "invalid_payload",
        };

        (
            self.status_code(),
            Json(ErrorResponse {
                status,
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
