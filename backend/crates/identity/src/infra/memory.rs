//! In-memory identity provider
//!
//! Issues deterministic credentials for a single identity. Used by the
//! development backend and by tests, which can script failures and delays.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;

use crate::domain::entity::credentials::Credentials;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::federated_token::Logins;
use crate::domain::value_object::{IdentityId, IdentityPoolId};
use crate::error::{IdentityError, IdentityResult};

/// Lifetime of issued credentials
const CREDENTIAL_TTL_SECS: i64 = 3600;

pub struct MemoryIdentityProvider {
    identity_id: String,
    delay: Option<Duration>,
    failures: Mutex<VecDeque<IdentityError>>,
    last_token: Mutex<Option<String>>,
    get_id_calls: AtomicUsize,
    exchange_calls: AtomicUsize,
}

impl MemoryIdentityProvider {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
            delay: None,
            failures: Mutex::new(VecDeque::new()),
            last_token: Mutex::new(None),
            get_id_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
        }
    }

    /// Delay every credential exchange by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next credential exchange with `err`
    pub fn fail_next(&self, err: impl Into<IdentityError>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err.into());
    }

    pub fn get_id_calls(&self) -> usize {
        self.get_id_calls.load(Ordering::SeqCst)
    }

    /// Number of credential exchanges attempted
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    /// Federated token presented with the latest exchange
    pub fn last_token(&self) -> Option<String> {
        self.last_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn identity_id(&self) -> IdentityResult<IdentityId> {
        IdentityId::new(self.identity_id.as_str()).map_err(|e| IdentityError::Internal(e.to_string()))
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    async fn get_id(
        &self,
        _pool_id: &IdentityPoolId,
        _logins: &Logins,
    ) -> IdentityResult<IdentityId> {
        self.get_id_calls.fetch_add(1, Ordering::SeqCst);
        self.identity_id()
    }

    async fn get_credentials(
        &self,
        identity_id: &IdentityId,
        logins: &Logins,
    ) -> IdentityResult<Credentials> {
        let n = self.exchange_calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .last_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(logins.token.expose().to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(err) = failure {
            return Err(err);
        }

        Ok(Credentials::new(
            identity_id.clone(),
            format!("ASIAMEMORY{n:06}"),
            format!("memory-secret-{n}"),
            format!("memory-session-{n}"),
            Some(Utc::now() + chrono::Duration::seconds(CREDENTIAL_TTL_SECS)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::federated_token::{FederatedToken, LoginProvider};
    use kernel::error::app_error::AppError;

    fn logins() -> Logins {
        Logins::new(LoginProvider::google(), FederatedToken::new("tok").unwrap())
    }

    #[tokio::test]
    async fn test_issues_fresh_keys_per_exchange() {
        let provider = MemoryIdentityProvider::new("U1");
        let pool = IdentityPoolId::new("pool").unwrap();

        let id = provider.get_id(&pool, &logins()).await.unwrap();
        let first = provider.get_credentials(&id, &logins()).await.unwrap();
        let second = provider.get_credentials(&id, &logins()).await.unwrap();

        assert_eq!(first.identity_id.as_str(), "U1");
        assert_ne!(first.access_key_id, second.access_key_id);
        assert_eq!(provider.exchange_calls(), 2);
        assert_eq!(provider.last_token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_scripted_failure_is_consumed_once() {
        let provider = MemoryIdentityProvider::new("U1");
        provider.fail_next(AppError::from_remote("ServiceUnavailableException", "down"));
        let id = IdentityId::new("U1").unwrap();

        assert!(provider.get_credentials(&id, &logins()).await.is_err());
        assert!(provider.get_credentials(&id, &logins()).await.is_ok());
    }
}
