//! Identity Entity
//!
//! "Who the current user is" for the lifetime of a session: the federated
//! identity id (the user key in the data store), the display email, and the
//! capability to renew the session's backend credentials.

use std::fmt;
use std::sync::Arc;

use platform::task::BoxFuture;

use crate::domain::value_object::{IdentityId, email::Email};
use crate::error::IdentityResult;

type RefreshFn = dyn Fn() -> BoxFuture<'static, IdentityResult<IdentityId>> + Send + Sync;

/// Renews the session's credentials
///
/// Resolves with the identity id the fresh credentials were issued for.
#[derive(Clone)]
pub struct RefreshHandle(Arc<RefreshFn>);

impl RefreshHandle {
    pub fn new<F>(refresh: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, IdentityResult<IdentityId>> + Send + Sync + 'static,
    {
        Self(Arc::new(refresh))
    }

    /// Start a refresh
    pub fn refresh(&self) -> BoxFuture<'static, IdentityResult<IdentityId>> {
        (self.0)()
    }
}

impl fmt::Debug for RefreshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshHandle")
    }
}

/// Signed-in identity
///
/// Immutable once created; the refresh capability only mutates the
/// credential store behind it.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: Email,
    refresh: RefreshHandle,
}

impl Identity {
    pub fn new(id: IdentityId, email: Email, refresh: RefreshHandle) -> Self {
        Self { id, email, refresh }
    }

    /// Renew backend credentials
    pub async fn refresh(&self) -> IdentityResult<IdentityId> {
        self.refresh.refresh().await
    }
}
