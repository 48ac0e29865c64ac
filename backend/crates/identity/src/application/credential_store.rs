//! Credential Store
//!
//! Holds the session's current backend credentials. Written only by the
//! credential exchange; transports take a snapshot at send time so that a
//! retried call picks up refreshed credentials.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::entity::credentials::Credentials;

#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<Arc<Credentials>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current credentials, if any have been issued
    pub fn snapshot(&self) -> Option<Arc<Credentials>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_none()
    }

    pub(crate) fn replace(&self, credentials: Credentials) -> Arc<Credentials> {
        let credentials = Arc::new(credentials);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::clone(&credentials));
        credentials
    }

    pub(crate) fn clear(&self) {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
