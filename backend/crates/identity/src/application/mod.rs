//! Application Layer
//!
//! Use cases and session-scoped services.

pub mod config;
pub mod credential_exchange;
pub mod credential_store;
pub mod identity_future;
pub mod session;
pub mod sign_in;

// Re-exports
pub use config::IdentityConfig;
pub use credential_exchange::CredentialExchange;
pub use credential_store::CredentialStore;
pub use identity_future::IdentityFuture;
pub use session::SessionContext;
pub use sign_in::{SignInInput, SignInUseCase};
