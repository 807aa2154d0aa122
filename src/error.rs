use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure to obtain a usable JSON body from a stats provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{provider} request timed out after {secs}s")]
    Timeout { provider: &'static str, secs: u64 },
    #[error("{provider} blocked request - server IP not allowed")]
    Blocked { provider: &'static str },
    #[error("{provider} API error: {status} {reason}")]
    Http {
        provider: &'static str,
        status: u16,
        reason: String,
    },
    #[error("{provider} returned invalid json: {source}")]
    InvalidJson {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid upstream url: {0}")]
    Url(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("club not found")]
    NotFound { hint: &'static str },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub const NOT_FOUND_HINT: &str =
    "The club must have played matches recently for data to be available.";

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::NotFound { hint } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Club not found. Check the club id or try searching by name.",
                    "hint": hint,
                }),
            ),
            ServiceError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "message": message }),
            ),
            ServiceError::Upstream(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "Failed to fetch club data from the stats provider.",
                    "message": err.to_string(),
                }),
            ),
            ServiceError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal error", "message": format!("{err:#}") }),
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }
        (status, Json(body)).into_response()
    }
}
