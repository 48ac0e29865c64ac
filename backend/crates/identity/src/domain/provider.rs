//! Provider Traits
//!
//! Interfaces to the external identity services. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::credentials::Credentials;
use crate::domain::value_object::federated_token::{FederatedToken, Logins};
use crate::domain::value_object::{IdentityId, IdentityPoolId};
use crate::error::IdentityResult;

/// Identity pool provider (exchanges federated logins for credentials)
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Resolve (or create) the pool identity for the given logins
    async fn get_id(
        &self,
        pool_id: &IdentityPoolId,
        logins: &Logins,
    ) -> IdentityResult<IdentityId>;

    /// Issue temporary credentials for an identity
    async fn get_credentials(
        &self,
        identity_id: &IdentityId,
        logins: &Logins,
    ) -> IdentityResult<Credentials>;
}

/// Federated sign-in that can hand out a fresh ID token
#[trait_variant::make(FederatedTokenSource: Send)]
pub trait LocalFederatedTokenSource {
    /// Obtain a new federated token (re-prompting or re-reading as needed)
    async fn reauthenticate(&self) -> IdentityResult<FederatedToken>;
}
