//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! identity and progress crates:
//! - The error taxonomy for remote calls ([`error::kind::ErrorKind`])
//! - The unified error type ([`error::app_error::AppError`])
//! - Opaque, provider-issued identifiers ([`id::Id`])
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
