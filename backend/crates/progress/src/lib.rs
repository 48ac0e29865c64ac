//! Progress Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Remote call model, value objects, transport trait
//! - `application/` - Request dispatcher and answer operations
//! - `infra/` - DynamoDB and in-memory transports
//! - `presentation/` - HTTP handlers
//!
//! ## Failure Model
//! - No call is sent before the session identity resolves
//! - Expired or invalid credentials trigger one refresh and one retry
//! - Every other failure is surfaced unchanged
//! - A missing answer is an empty result, not an error

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::answers::AnswerService;
pub use application::config::ProgressConfig;
pub use application::dispatcher::{Dispatcher, RetryAction};
pub use error::{ProgressError, ProgressResult};
pub use infra::{DynamoDbTransport, MemoryTransport};
pub use presentation::router::progress_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::transport::{CallOutcome, CallPayload, RemoteFailure, Transport};
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
