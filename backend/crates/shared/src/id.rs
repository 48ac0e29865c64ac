//! Common ID Types
//!
//! Type-safe wrappers for opaque, provider-issued identifiers.
//! The values are never parsed or generated locally; they are whatever the
//! identity provider hands out (e.g. `ap-northeast-1:bd71bede-...`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Error returned when an identifier is empty
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must not be empty")]
pub struct EmptyIdError;

/// Generic typed opaque ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type IdentityId = Id<markers::Identity>;
///
/// let id = IdentityId::new("ap-northeast-1:1234").unwrap();
/// assert_eq!(id.as_str(), "ap-northeast-1:1234");
/// ```
pub struct Id<T> {
    value: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a provider-issued value (must not be blank)
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyIdError);
        }
        Ok(Self {
            value: Arc::from(value),
            _marker: PhantomData,
        })
    }

    /// Get the raw value
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Id::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for federated identity IDs (the user key in the data store)
    pub struct Identity;

    /// Marker for identity pool IDs
    pub struct IdentityPool;
}

/// Type aliases for common IDs
pub type IdentityId = Id<markers::Identity>;
pub type IdentityPoolId = Id<markers::IdentityPool>;
