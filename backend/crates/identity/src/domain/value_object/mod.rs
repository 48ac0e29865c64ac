//! Value Object Module

pub mod email;
pub mod federated_token;

pub use kernel::id::{IdentityId, IdentityPoolId};
