//! Error handling for the hospital server
//!
//! Every failure leaves the server as `{"error": "..."}`. Validation, missing
//! records and duplicate emails keep their message; anything else is logged
//! and replaced by the fixed message of the route that failed.

use axum::{
    BoxError, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hospital_core::HospitalError;
use std::fmt;
use tracing::error;

/// Server-specific error type that can be converted to HTTP responses
#[derive(Debug)]
pub enum ServerError {
    /// Invalid request parameters or body
    BadRequest(String),

    /// Referenced record not found
    NotFound(String),

    /// Unique field already taken
    Conflict(String),

    /// Request body exceeds the configured limit
    PayloadTooLarge,

    /// Request did not complete within the configured timeout
    Timeout,

    /// Unexpected failure; the cause has already been logged
    Internal(&'static str),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServerError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServerError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServerError::PayloadTooLarge => write!(f, "Payload too large"),
            ServerError::Timeout => write!(f, "Request timeout"),
            ServerError::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl ServerError {
    /// Classify a library error, falling back to `failure` for a 500.
    pub fn from_core(err: HospitalError, failure: &'static str) -> Self {
        match err {
            HospitalError::Validation(msg) => ServerError::BadRequest(msg),
            HospitalError::NotFound(msg) => ServerError::NotFound(msg),
            HospitalError::Conflict(msg) => ServerError::Conflict(msg),
            other => {
                error!("{}: {}", failure, other);
                ServerError::Internal(failure)
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ServerError::BadRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::Conflict(msg) => msg,
            ServerError::PayloadTooLarge => "Request body too large",
            ServerError::Timeout => "Request timed out",
            ServerError::Internal(msg) => msg,
        }
    }
}

/// Attach a route's 500 message to a library result.
pub trait OrFail<T> {
    fn or_fail(self, failure: &'static str) -> ServerResult<T>;
}

impl<T> OrFail<T> for Result<T, HospitalError> {
    fn or_fail(self, failure: &'static str) -> ServerResult<T> {
        self.map_err(|e| ServerError::from_core(e, failure))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Turn a failure raised by a tower middleware (timeout) into a JSON error.
pub async fn handle_layer_error(err: BoxError) -> ServerError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ServerError::Timeout
    } else {
        error!("Unhandled middleware error: {}", err);
        ServerError::Internal("Internal server error")
    }
}
