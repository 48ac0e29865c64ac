//! Federated token sources
//!
//! Re-authentication hooks used when backend credentials must be renewed.
//! The interactive sign-in itself lives outside this crate; these sources
//! only pick up the token it produced.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::provider::FederatedTokenSource;
use crate::domain::value_object::federated_token::FederatedToken;
use crate::error::{IdentityError, IdentityResult};

/// Always hands back the same token
#[derive(Debug)]
pub struct StaticTokenSource {
    token: FederatedToken,
    calls: AtomicUsize,
}

impl StaticTokenSource {
    pub fn new(token: FederatedToken) -> Self {
        Self {
            token,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of re-authentications served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FederatedTokenSource for StaticTokenSource {
    async fn reauthenticate(&self) -> IdentityResult<FederatedToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}

/// Re-reads a token file on every re-authentication
///
/// An external sign-in helper is expected to keep the file current.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the token once, e.g. for the initial sign-in
    pub async fn read(&self) -> IdentityResult<FederatedToken> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            IdentityError::TokenSource(format!("{}: {e}", self.path.display()))
        })?;
        FederatedToken::new(contents)
            .map_err(|e| IdentityError::TokenSource(format!("{}: {e}", self.path.display())))
    }
}

impl FederatedTokenSource for FileTokenSource {
    async fn reauthenticate(&self) -> IdentityResult<FederatedToken> {
        tracing::debug!(path = %self.path.display(), "Re-reading federated token");
        self.read().await
    }
}
