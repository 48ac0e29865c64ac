//! Infrastructure Layer
//!
//! Transports to the answer store.

pub mod dynamodb;
pub mod memory;

pub use dynamodb::DynamoDbTransport;
pub use memory::MemoryTransport;
