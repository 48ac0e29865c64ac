//! Identity Error Types
//!
//! This module provides identity-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::task::Elapsed;
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
///
/// `Clone` so that one credential exchange outcome can be handed to every
/// caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// No federated token has been supplied yet
    #[error("Not signed in")]
    NotSignedIn,

    /// The session already holds an identity
    #[error("Session is already signed in")]
    AlreadySignedIn,

    /// Email failed validation
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Federated token is empty or malformed
    #[error("Invalid federated token: {0}")]
    InvalidToken(String),

    /// The identity provider rejected the exchange
    #[error("Identity provider error: {0}")]
    Provider(AppError),

    /// Re-authentication with the federated sign-in failed
    #[error("Re-authentication failed: {0}")]
    TokenSource(String),

    /// Credential exchange or identity wait took too long
    #[error("Timed out: {0}")]
    Timeout(#[from] Elapsed),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::NotSignedIn => ErrorKind::AuthorizationExpired,
            IdentityError::AlreadySignedIn => ErrorKind::Conflict,
            IdentityError::InvalidEmail(_) | IdentityError::InvalidToken(_) => {
                ErrorKind::BadRequest
            }
            IdentityError::Provider(err) => err.kind(),
            IdentityError::TokenSource(_) => ErrorKind::AuthorizationExpired,
            IdentityError::Timeout(_) => ErrorKind::RequestTimeout,
            IdentityError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Provider errors keep their remote code.
    pub fn to_app_error(&self) -> AppError {
        match self {
            IdentityError::Provider(err) => err.clone(),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            IdentityError::Provider(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Identity provider failure");
            }
            IdentityError::Provider(err) => {
                tracing::warn!(error = %err, "Identity provider rejected exchange");
            }
            IdentityError::TokenSource(msg) => {
                tracing::warn!(message = %msg, "Federated re-authentication failed");
            }
            IdentityError::Timeout(elapsed) => {
                tracing::warn!(error = %elapsed, "Identity operation timed out");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl From<AppError> for IdentityError {
    fn from(err: AppError) -> Self {
        IdentityError::Provider(err)
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        err.to_app_error()
    }
}
