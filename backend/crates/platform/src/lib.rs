//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, hex)
//! - AWS Signature Version 4 request signing
//! - Single-assignment async values ([`deferred::Deferred`])
//! - In-flight call deduplication ([`single_flight::SingleFlight`])
//! - Timeouts and boxed futures ([`task`])

pub mod crypto;
pub mod deferred;
pub mod signing;
pub mod single_flight;
pub mod task;
