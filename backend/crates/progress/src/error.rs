//! Progress Error Types
//!
//! This module provides progress-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use identity::IdentityError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::task::Elapsed;
use thiserror::Error;

use crate::domain::transport::RemoteFailure;

/// Progress-specific result type alias
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Progress-specific error variants
#[derive(Debug, Clone, Error)]
pub enum ProgressError {
    /// Problem id is not a positive number
    #[error("Invalid problem id: {0}")]
    InvalidProblemId(String),

    /// Answer failed validation
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    /// The session identity did not resolve in time
    #[error("Identity is not available: {0}")]
    IdentityNotReady(#[source] IdentityError),

    /// The store rejected the call
    #[error("Remote call failed: {0}")]
    Remote(RemoteFailure),

    /// Credentials expired and could not be renewed
    #[error("Credential refresh failed: {0}")]
    Refresh(#[source] IdentityError),

    /// Credentials were still rejected after the allowed retries
    #[error("Gave up after {attempts} attempt(s): {last}")]
    RetryExhausted { attempts: u32, last: RemoteFailure },

    /// No response within the call timeout
    #[error("Remote call timed out: {0}")]
    Timeout(#[from] Elapsed),

    /// The store answered with something that is not a valid item
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProgressError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressError::InvalidProblemId(_) | ProgressError::InvalidAnswer(_) => {
                ErrorKind::BadRequest
            }
            ProgressError::IdentityNotReady(_) => ErrorKind::ServiceUnavailable,
            ProgressError::Remote(failure) => failure.kind(),
            ProgressError::Refresh(_) | ProgressError::RetryExhausted { .. } => {
                ErrorKind::AuthorizationExpired
            }
            ProgressError::Timeout(_) => ErrorKind::RequestTimeout,
            ProgressError::MalformedPayload(_) => ErrorKind::Transport,
            ProgressError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Remote failures keep their code.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ProgressError::Remote(failure) => failure.to_app_error(),
            ProgressError::RetryExhausted { last, .. } => {
                AppError::new(self.kind(), self.to_string()).with_code(last.code.clone())
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ProgressError::Remote(failure) if failure.kind().is_server_error() => {
                tracing::error!(error = %failure, "Progress store failure");
            }
            ProgressError::Refresh(err) => {
                tracing::warn!(error = %err, "Credential refresh failed");
            }
            ProgressError::RetryExhausted { attempts, last } => {
                tracing::warn!(attempts, error = %last, "Retries exhausted");
            }
            ProgressError::Timeout(elapsed) => {
                tracing::warn!(error = %elapsed, "Progress call timed out");
            }
            ProgressError::MalformedPayload(msg) | ProgressError::Internal(msg) => {
                tracing::error!(message = %msg, "Progress internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Progress error");
            }
        }
    }
}

impl From<ProgressError> for AppError {
    fn from(err: ProgressError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ProgressError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
