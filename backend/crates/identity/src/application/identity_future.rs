//! Identity Future
//!
//! Session-wide handle to "who the current user is". Resolved exactly once
//! by sign-in; every consumer observes the same `Arc<Identity>`.

use std::sync::Arc;
use std::time::Duration;

use platform::deferred::Deferred;
use platform::task::with_timeout;

use crate::domain::entity::identity::Identity;
use crate::error::{IdentityError, IdentityResult};

#[derive(Debug, Default)]
pub struct IdentityFuture {
    inner: Deferred<Identity>,
}

impl IdentityFuture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve with the signed-in identity
    ///
    /// Fails with `AlreadySignedIn` if already resolved; the first identity
    /// stays in place.
    pub fn resolve(&self, identity: Identity) -> IdentityResult<Arc<Identity>> {
        self.inner.resolve(identity).map_err(|rejected| {
            tracing::warn!(
                identity_id = %rejected.0.id,
                "Identity already resolved, ignoring second resolution"
            );
            IdentityError::AlreadySignedIn
        })
    }

    /// Run `consumer` once the identity is known
    ///
    /// Runs immediately when already resolved. Queued consumers run in the
    /// order they were registered.
    pub fn when_ready<F>(&self, consumer: F)
    where
        F: FnOnce(&Arc<Identity>) + Send + 'static,
    {
        self.inner.when_ready(consumer);
    }

    pub async fn wait(&self) -> Arc<Identity> {
        self.inner.wait().await
    }

    /// Wait for the identity, giving up after `limit`
    pub async fn wait_timeout(&self, limit: Duration) -> IdentityResult<Arc<Identity>> {
        Ok(with_timeout(limit, self.inner.wait()).await?)
    }

    pub fn current(&self) -> Option<Arc<Identity>> {
        self.inner.current()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}
