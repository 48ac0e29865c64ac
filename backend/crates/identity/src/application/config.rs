//! Application Configuration
//!
//! Configuration for the identity application layer.

use std::time::Duration;

use kernel::id::IdentityPoolId;

use crate::domain::value_object::federated_token::LoginProvider;

/// Identity application configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Provider region (e.g. `ap-northeast-1`)
    pub region: String,
    /// Identity pool to exchange logins against
    pub identity_pool_id: Option<IdentityPoolId>,
    /// Key of the federated token in the `Logins` map
    pub login_provider: LoginProvider,
    /// Override of the provider endpoint (local emulators, tests)
    pub endpoint: Option<String>,
    /// Upper bound for one credential exchange (including re-authentication)
    pub exchange_timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            region: "ap-northeast-1".to_string(),
            identity_pool_id: None,
            login_provider: LoginProvider::google(),
            endpoint: None,
            exchange_timeout: Duration::from_secs(15),
        }
    }
}

impl IdentityConfig {
    /// Create config for a given pool
    pub fn for_pool(region: impl Into<String>, identity_pool_id: IdentityPoolId) -> Self {
        Self {
            region: region.into(),
            identity_pool_id: Some(identity_pool_id),
            ..Default::default()
        }
    }

    /// Create config for development (short timeouts)
    pub fn development() -> Self {
        Self {
            exchange_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Provider endpoint URL
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://cognito-identity.{}.amazonaws.com/", self.region))
    }
}
