//! Identity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, provider traits
//! - `application/` - Sign-in, credential exchange, session state
//! - `infra/` - Cognito Identity and in-memory providers, token sources
//!
//! ## Features
//! - Federated sign-in (Google ID token) exchanged for temporary credentials
//! - Session-wide identity future, resolved exactly once
//! - Deduplicated, time-bounded credential refresh
//!
//! ## Security Model
//! - Federated tokens and secret keys are zeroized on drop
//! - Secrets never appear in `Debug` output or logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{
    CredentialExchange, CredentialStore, IdentityConfig, IdentityFuture, SessionContext,
    SignInInput, SignInUseCase,
};
pub use domain::{Credentials, FederatedTokenSource, Identity, IdentityProvider};
pub use error::{IdentityError, IdentityResult};
pub use infra::{CognitoIdentityProvider, FileTokenSource, MemoryIdentityProvider, StaticTokenSource};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
