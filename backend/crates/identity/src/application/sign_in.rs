//! Sign In Use Case
//!
//! Turns a federated token into a session identity with live backend
//! credentials.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::credential_exchange::CredentialExchange;
use crate::application::session::SessionContext;
use crate::domain::entity::identity::{Identity, RefreshHandle};
use crate::domain::provider::{FederatedTokenSource, IdentityProvider};
use crate::domain::value_object::{email::Email, federated_token::FederatedToken};
use crate::error::{IdentityError, IdentityResult};

/// Sign in input
pub struct SignInInput {
    /// ID token from the external sign-in
    pub federated_token: String,
    /// Address reported by the external sign-in
    pub email: String,
}

/// Sign in use case
pub struct SignInUseCase<P, S>
where
    P: IdentityProvider,
    S: FederatedTokenSource,
{
    session: Arc<SessionContext>,
    exchange: Arc<CredentialExchange<P>>,
    token_source: Arc<S>,
}

impl<P, S> SignInUseCase<P, S>
where
    P: IdentityProvider + Sync + 'static,
    S: FederatedTokenSource + Sync + 'static,
{
    pub fn new(
        session: Arc<SessionContext>,
        provider: Arc<P>,
        token_source: Arc<S>,
        config: Arc<IdentityConfig>,
    ) -> Self {
        let exchange = CredentialExchange::new(provider, config, Arc::clone(session.credentials()));
        Self {
            session,
            exchange: Arc::new(exchange),
            token_source,
        }
    }

    pub fn exchange(&self) -> &Arc<CredentialExchange<P>> {
        &self.exchange
    }

    pub async fn execute(&self, input: SignInInput) -> IdentityResult<Arc<Identity>> {
        if self.session.is_signed_in() {
            return Err(IdentityError::AlreadySignedIn);
        }

        let email = Email::new(input.email)?;
        let token = FederatedToken::new(input.federated_token)?;

        self.exchange.replace_federated_token(token);
        let identity_id = self.exchange.obtain_or_refresh().await?;

        let identity = Identity::new(identity_id, email, self.refresh_handle());
        let identity = self.session.identity().resolve(identity)?;

        tracing::info!(
            identity_id = %identity.id,
            email_domain = %identity.email.domain(),
            "User signed in"
        );

        Ok(identity)
    }

    /// Re-authenticate through the token source, then exchange again
    fn refresh_handle(&self) -> RefreshHandle {
        let exchange = Arc::clone(&self.exchange);
        let source = Arc::clone(&self.token_source);
        RefreshHandle::new(move || {
            let exchange = Arc::clone(&exchange);
            let source = Arc::clone(&source);
            Box::pin(async move {
                tracing::debug!("Refreshing credentials");
                exchange
                    .refresh_with(source.as_ref())
                    .await
                    .inspect_err(IdentityError::log)
            })
        })
    }
}
