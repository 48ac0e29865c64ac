//! Entity Module

pub mod credentials;
pub mod identity;
