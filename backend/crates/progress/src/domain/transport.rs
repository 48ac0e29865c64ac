//! Transport Trait
//!
//! Interface to the remote store. Implementations live in the infra layer.

use std::fmt;

use kernel::error::app_error::AppError;
use kernel::error::kind::{ErrorKind, normalize_remote_code};
use serde_json::{Map, Value};

use crate::domain::entities::RemoteCall;

/// Success payload, shaped like the store's JSON response
#[derive(Debug, Clone, PartialEq)]
pub struct CallPayload(Value);

impl CallPayload {
    pub fn new(data: Value) -> Self {
        Self(data)
    }

    /// `{}`: the response to a write, or a read that found nothing
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn data(&self) -> &Value {
        &self.0
    }

    /// The `Item` member, when present
    pub fn item(&self) -> Option<&Map<String, Value>> {
        self.0.get("Item").and_then(Value::as_object)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Failure reported for one remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// Error code, e.g. `ExpiredTokenException` (namespace stripped)
    pub code: String,
    pub message: String,
    /// HTTP status when the failure came from a response
    pub status: Option<u16>,
}

impl RemoteFailure {
    pub fn new(code: impl AsRef<str>, message: impl Into<String>) -> Self {
        Self {
            code: normalize_remote_code(code.as_ref()).to_string(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Classify by code, falling back to the status for unknown codes
    pub fn kind(&self) -> ErrorKind {
        match (ErrorKind::from_remote_code(&self.code), self.status) {
            (ErrorKind::Internal, Some(status)) => ErrorKind::from_status(status),
            (kind, _) => kind,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.message.clone()).with_code(self.code.clone())
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        Ok(())
    }
}

/// Outcome of one send, delivered as a single value
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success(CallPayload),
    Failure(RemoteFailure),
}

/// Remote store transport
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Send one call and report its outcome
    ///
    /// Never fails out of band: every error, including local ones such as
    /// missing credentials, is reported as `CallOutcome::Failure`.
    async fn send(&self, call: &RemoteCall) -> CallOutcome;
}
