/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Server-side error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unrecognized identifier; never retried
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Upstream answered with a non-success status
    #[error("{message}")]
    Upstream { status: u16, message: String },
    /// Transport failure or timeout talking to an upstream
    #[error("External API error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map an upstream status to the client-facing error, without leaking upstream bodies.
    pub fn from_upstream_status(status: u16) -> Self {
        match status {
            404 => ApiError::NotFound("Planet not found".to_string()),
            500..=599 => ApiError::Upstream {
                status,
                message: "External server error".to_string(),
            },
            _ => ApiError::Upstream {
                status,
                message: "Connection error with the external API".to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Http(e) => e
                .status()
                .map(|s| s.as_u16())
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Http(e) if e.is_timeout() => {
                "Connection error: upstream timed out".to_string()
            }
            ApiError::Http(_) => "Connection error with the external API".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Client-side failure while talking to the planets API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx answer; `message` is the server's `error` field when present
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
