//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains the request dispatcher and the answer operations built on it.

pub mod answers;
pub mod config;
pub mod dispatcher;
