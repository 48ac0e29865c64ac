//! Domain Layer
//!
//! Contains entities, value objects, and provider traits.

pub mod entity;
pub mod provider;
pub mod value_object;

// Re-exports
pub use entity::{credentials::Credentials, identity::Identity};
pub use provider::{FederatedTokenSource, IdentityProvider};
