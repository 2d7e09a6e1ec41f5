//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Handlers attach their [`RequestClock`] to a failure with
//! [`ForRequest::for_request`], so error envelopes carry the same request id
//! and timing as success envelopes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use salesdesk_types::error::{GenerationError, StoreError, TurnError};

use super::response::{ApiResponse, RequestClock, status_for_code};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Turn(TurnError),
    /// Malformed request that never reached the controller.
    Validation(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl AppError {
    /// Envelope error code and client-facing message.
    ///
    /// Store failures get a fixed message; the underlying error (which may
    /// name server paths) only goes to the log.
    pub fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Turn(TurnError::Validation(msg)) | AppError::Validation(msg) => {
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::Turn(TurnError::Generation(e @ GenerationError::Timeout { .. })) => {
                ("GENERATION_TIMEOUT", e.to_string())
            }
            AppError::Turn(TurnError::Generation(e)) => ("GENERATION_FAILED", e.to_string()),
            AppError::Turn(TurnError::Store(StoreError::Corrupt { .. })) => (
                "STORE_CORRUPT",
                "Session store is corrupt and was left untouched".to_string(),
            ),
            AppError::Turn(TurnError::Store(_)) => {
                ("STORE_ERROR", "Session store is unavailable".to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for_code(self.code_and_message().0)
    }

    fn detail(&self) -> String {
        match self {
            AppError::Turn(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

/// An [`AppError`] tied to the request that produced it.
#[derive(Debug)]
pub struct RequestError {
    pub error: AppError,
    clock: RequestClock,
}

pub trait ForRequest<T> {
    fn for_request(self, clock: &RequestClock) -> Result<T, RequestError>;
}

impl<T, E: Into<AppError>> ForRequest<T> for Result<T, E> {
    fn for_request(self, clock: &RequestClock) -> Result<T, RequestError> {
        self.map_err(|e| RequestError {
            error: e.into(),
            clock: clock.clone(),
        })
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (code, message) = self.error.code_and_message();
        let detail = self.error.detail();
        let request_id = &self.clock.request_id;

        if self.error.status().is_server_error() {
            tracing::error!(%request_id, code, error = %detail, "Request failed");
        } else {
            tracing::warn!(%request_id, code, error = %detail, "Request rejected");
        }

        ApiResponse::error(code, &message, &self.clock).into_response()
    }
}
