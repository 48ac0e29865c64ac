//! Session Context
//!
//! Per-session state shared by sign-in and every data access component:
//! the identity future and the credential store. Created at session start
//! and passed around by `Arc`; dropping the last handle tears it down.

use std::sync::Arc;

use crate::application::credential_store::CredentialStore;
use crate::application::identity_future::IdentityFuture;

#[derive(Debug)]
pub struct SessionContext {
    identity: IdentityFuture,
    credentials: Arc<CredentialStore>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            identity: IdentityFuture::new(),
            credentials: Arc::new(CredentialStore::new()),
        }
    }

    pub fn identity(&self) -> &IdentityFuture {
        &self.identity
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_resolved()
    }

    /// Sign out: drop the backend credentials
    ///
    /// The identity itself stays resolved for the rest of the session.
    pub fn end(&self) {
        self.credentials.clear();
        tracing::info!(
            identity_id = ?self.identity.current().map(|identity| identity.id.to_string()),
            "Session ended"
        );
    }
}
