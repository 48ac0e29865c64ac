//! Infrastructure Layer
//!
//! Identity provider clients and federated token sources.

pub mod cognito;
pub mod memory;
pub mod token_source;

pub use cognito::CognitoIdentityProvider;
pub use memory::MemoryIdentityProvider;
pub use token_source::{FileTokenSource, StaticTokenSource};
