//! Error types surfaced by the gateway core.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure to obtain an upstream access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed with status code {0}")]
    Status(u16),
    #[error("no access_token found in response")]
    MissingAccessToken,
    #[error("failed to parse authentication response as JSON: {0}")]
    InvalidJson(String),
    #[error("error obtaining access token: {0}")]
    Transport(String),
    #[error("access token is not a valid header value")]
    InvalidHeader,
}

/// Failure of a logical gateway query.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to obtain authentication token")]
    Auth(#[from] AuthError),
    #[error("API Error: {status}")]
    UpstreamHttp { status: u16 },
    #[error("API request failed: {0}")]
    Transport(String),
    #[error("Invalid JSON response from API")]
    MalformedResponse,
}

impl GatewayError {
    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamHttp { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            GatewayError::Auth(_) | GatewayError::Transport(_) | GatewayError::MalformedResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The `{"error": ...}` body returned to clients.
    pub fn payload(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.payload())).into_response()
    }
}
