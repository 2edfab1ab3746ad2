//! HTTP mapping of service errors.
//!
//! Every error is rendered as
//! `{"status": 400, "error": "Bad Request", "message": "...", "timestamp": "..."}`.
//! Client errors carry their detail in `message`; server-side failures are
//! logged and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use linkflake_core::Error;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as a shorten request.
    BadRequest(String),
    /// The shortening service rejected or failed the request.
    Service(Error),
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    error: &'static str,
    message: String,
    timestamp: DateTime<Utc>,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Service(Error::InvalidUrl { reason }) => (StatusCode::BAD_REQUEST, reason),
            Self::Service(err @ Error::NotFound { .. }) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Service(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_owned(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            message,
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
