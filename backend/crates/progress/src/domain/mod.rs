//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (RemoteCall, AnswerKey, FetchedAnswer)
//! - Domain value objects (ProblemId, Answer, Attempt)
//! - Domain services (failure classification, item format)
//! - Transport trait (interface to the remote store)

pub mod entities;
pub mod services;
pub mod transport;
pub mod value_objects;
