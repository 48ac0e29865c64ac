//! Federated Token Value Objects
//!
//! The ID token issued by the external sign-in (e.g. Google) and the
//! provider key it is registered under in the identity pool's `Logins` map.

use std::collections::BTreeMap;
use std::fmt;

use derive_more::Display;
use zeroize::Zeroizing;

use crate::error::{IdentityError, IdentityResult};

/// Login provider key, e.g. `accounts.google.com`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct LoginProvider(String);

impl LoginProvider {
    pub const GOOGLE: &'static str = "accounts.google.com";

    pub fn new(provider: impl Into<String>) -> IdentityResult<Self> {
        let provider = provider.into().trim().to_string();
        if provider.is_empty() || provider.contains(char::is_whitespace) {
            return Err(IdentityError::InvalidToken(format!(
                "invalid login provider `{provider}`"
            )));
        }
        Ok(Self(provider))
    }

    pub fn google() -> Self {
        Self(Self::GOOGLE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Federated ID token (opaque, short-lived)
///
/// Wiped from memory on drop; never printed.
#[derive(Clone)]
pub struct FederatedToken(Zeroizing<String>);

impl FederatedToken {
    pub fn new(token: impl Into<String>) -> IdentityResult<Self> {
        let token = Zeroizing::new(token.into());
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::InvalidToken("token is empty".into()));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(IdentityError::InvalidToken("token contains whitespace".into()));
        }
        Ok(Self(Zeroizing::new(trimmed.to_string())))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FederatedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FederatedToken(<redacted>)")
    }
}

/// `Logins` map sent with every provider exchange
#[derive(Debug, Clone)]
pub struct Logins {
    pub provider: LoginProvider,
    pub token: FederatedToken,
}

impl Logins {
    pub fn new(provider: LoginProvider, token: FederatedToken) -> Self {
        Self { provider, token }
    }

    /// Wire form: `{ "<provider>": "<token>" }`
    pub fn to_map(&self) -> BTreeMap<&str, &str> {
        BTreeMap::from([(self.provider.as_str(), self.token.expose())])
    }
}
