//! Credential Exchange
//!
//! Trades the federated token for temporary backend credentials and keeps
//! the credential store current. Concurrent callers share one in-flight
//! exchange.

use std::sync::{Arc, PoisonError, RwLock};

use platform::single_flight::SingleFlight;
use platform::task::with_timeout;

use crate::application::config::IdentityConfig;
use crate::application::credential_store::CredentialStore;
use crate::domain::provider::{FederatedTokenSource, IdentityProvider};
use crate::domain::value_object::IdentityId;
use crate::domain::value_object::federated_token::{FederatedToken, Logins};
use crate::error::{IdentityError, IdentityResult};

pub struct CredentialExchange<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<IdentityConfig>,
    store: Arc<CredentialStore>,
    token: RwLock<Option<FederatedToken>>,
    /// Identity id from the first `GetId`; reused by later exchanges
    identity_id: RwLock<Option<IdentityId>>,
    inflight: SingleFlight<IdentityId, IdentityError>,
}

impl<P> CredentialExchange<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<IdentityConfig>, store: Arc<CredentialStore>) -> Self {
        Self {
            provider,
            config,
            store,
            token: RwLock::new(None),
            identity_id: RwLock::new(None),
            inflight: SingleFlight::new(),
        }
    }

    /// Swap the federated token used by subsequent exchanges
    pub fn replace_federated_token(&self, token: FederatedToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn has_federated_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether an exchange is currently running
    pub fn is_exchanging(&self) -> bool {
        self.inflight.is_running()
    }

    /// Obtain fresh credentials with the current federated token
    ///
    /// Resolves with the identity id the credentials were issued for.
    pub async fn obtain_or_refresh(&self) -> IdentityResult<IdentityId> {
        self.inflight
            .run(|| async {
                with_timeout(self.config.exchange_timeout, self.exchange())
                    .await
                    .unwrap_or_else(|elapsed| Err(elapsed.into()))
            })
            .await
    }

    /// Re-authenticate through `source`, then exchange the new token
    ///
    /// Shares the in-flight slot with `obtain_or_refresh`, so a burst of
    /// expired calls re-authenticates once.
    pub async fn refresh_with<S>(&self, source: &S) -> IdentityResult<IdentityId>
    where
        S: FederatedTokenSource,
    {
        self.inflight
            .run(|| async {
                with_timeout(self.config.exchange_timeout, async {
                    let token = source.reauthenticate().await?;
                    self.replace_federated_token(token);
                    self.exchange().await
                })
                .await
                .unwrap_or_else(|elapsed| Err(elapsed.into()))
            })
            .await
    }

    async fn exchange(&self) -> IdentityResult<IdentityId> {
        let pool_id = self.config.identity_pool_id.clone().ok_or_else(|| {
            IdentityError::Internal("identity pool id is not configured".to_string())
        })?;
        let token = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(IdentityError::NotSignedIn)?;
        let logins = Logins::new(self.config.login_provider.clone(), token);

        let cached = self
            .identity_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let identity_id = match cached {
            Some(id) => id,
            None => {
                let id = self
                    .provider
                    .get_id(&pool_id, &logins)
                    .await
                    .inspect_err(IdentityError::log)?;
                tracing::debug!(identity_id = %id, "Resolved federated identity");
                id
            }
        };

        let credentials = self
            .provider
            .get_credentials(&identity_id, &logins)
            .await
            .inspect_err(IdentityError::log)?;
        let issued_for = credentials.identity_id.clone();
        let credentials = self.store.replace(credentials);

        *self
            .identity_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(issued_for.clone());

        tracing::info!(
            identity_id = %issued_for,
            access_key_id = %credentials.access_key_id,
            expiration = ?credentials.expiration,
            "Credentials exchanged"
        );

        Ok(issued_for)
    }
}
