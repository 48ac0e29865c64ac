//! Credentials Entity
//!
//! Temporary backend credentials issued by the identity provider for one
//! federated identity. Expiry is reported by the provider but this crate
//! never acts on it; an expired credential is discovered by a failed call.

use chrono::{DateTime, Utc};
use platform::signing::SigningKeys;
use zeroize::Zeroizing;

use crate::domain::value_object::IdentityId;

/// Temporary credentials
#[derive(Clone)]
pub struct Credentials {
    /// Identity the credentials were issued for
    pub identity_id: IdentityId,
    pub access_key_id: String,
    secret_key: Zeroizing<String>,
    session_token: Zeroizing<String>,
    /// Provider-reported expiration (informational)
    pub expiration: Option<DateTime<Utc>>,
    /// When this crate received the credentials
    pub issued_at: DateTime<Utc>,
}

impl Credentials {
    pub fn new(
        identity_id: IdentityId,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            identity_id,
            access_key_id: access_key_id.into(),
            secret_key: Zeroizing::new(secret_key.into()),
            session_token: Zeroizing::new(session_token.into()),
            expiration,
            issued_at: Utc::now(),
        }
    }

    /// Borrow the key material for request signing
    pub fn signing_keys(&self) -> SigningKeys<'_> {
        SigningKeys {
            access_key_id: &self.access_key_id,
            secret_key: &self.secret_key,
            session_token: Some(self.session_token.as_str()).filter(|t| !t.is_empty()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity_id", &self.identity_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
