//! Cognito Identity provider
//!
//! Talks to the Cognito Identity JSON 1.1 API. `GetId` and
//! `GetCredentialsForIdentity` are unauthenticated calls: the federated
//! token in `Logins` is the proof of identity, so no request signing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::error::kind::{ErrorKind, normalize_remote_code};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::config::IdentityConfig;
use crate::domain::entity::credentials::Credentials;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::federated_token::Logins;
use crate::domain::value_object::{IdentityId, IdentityPoolId};
use crate::error::{IdentityError, IdentityResult};

const TARGET_PREFIX: &str = "AWSCognitoIdentityService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdRequest<'a> {
    identity_pool_id: &'a str,
    logins: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdResponse {
    identity_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsRequest<'a> {
    identity_id: &'a str,
    logins: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsResponse {
    identity_id: String,
    credentials: WireCredentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireCredentials {
    access_key_id: String,
    secret_key: String,
    session_token: String,
    /// Epoch seconds
    expiration: Option<f64>,
}

impl std::fmt::Debug for WireCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Map a non-2xx response onto the shared error vocabulary
fn decode_error(status: u16, body: &[u8]) -> AppError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_type: Some(raw),
            message,
        }) => AppError::from_remote(
            normalize_remote_code(&raw).to_string(),
            message.unwrap_or_else(|| format!("HTTP {status}")),
        ),
        _ => AppError::new(
            ErrorKind::from_status(status),
            format!("Identity provider returned HTTP {status}"),
        ),
    }
}

fn expiration_from_epoch(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}

// ============================================================================
// Provider
// ============================================================================

/// Cognito Identity client
#[derive(Debug, Clone)]
pub struct CognitoIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl CognitoIdentityProvider {
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.exchange_timeout)
            .build()
            .map_err(AppError::from)?;
        Ok(Self::with_client(client, config.endpoint_url()))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn call<Req, Resp>(&self, action: &str, request: &Req) -> IdentityResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(request).map_err(AppError::from)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(AppError::from)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(AppError::from)?;

        if !status.is_success() {
            let err = decode_error(status.as_u16(), &bytes);
            tracing::debug!(action, status = status.as_u16(), error = %err, "Cognito call failed");
            return Err(err.into());
        }

        Ok(serde_json::from_slice(&bytes).map_err(AppError::from)?)
    }
}

impl IdentityProvider for CognitoIdentityProvider {
    async fn get_id(
        &self,
        pool_id: &IdentityPoolId,
        logins: &Logins,
    ) -> IdentityResult<IdentityId> {
        let request = GetIdRequest {
            identity_pool_id: pool_id.as_str(),
            logins: logins.to_map(),
        };
        let response: GetIdResponse = self.call("GetId", &request).await?;
        IdentityId::new(response.identity_id).map_err(|e| IdentityError::Internal(e.to_string()))
    }

    async fn get_credentials(
        &self,
        identity_id: &IdentityId,
        logins: &Logins,
    ) -> IdentityResult<Credentials> {
        let request = GetCredentialsRequest {
            identity_id: identity_id.as_str(),
            logins: logins.to_map(),
        };
        let response: GetCredentialsResponse =
            self.call("GetCredentialsForIdentity", &request).await?;

        let issued_for = IdentityId::new(response.identity_id)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;
        let wire = response.credentials;
        Ok(Credentials::new(
            issued_for,
            wire.access_key_id,
            wire.secret_key,
            wire.session_token,
            wire.expiration.and_then(expiration_from_epoch),
        ))
    }
}
