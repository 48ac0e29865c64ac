//! DynamoDB transport
//!
//! Speaks the DynamoDB JSON 1.0 protocol (`GetItem` / `PutItem`), signing
//! each request with a snapshot of the session credentials taken at send
//! time.

use std::sync::Arc;

use chrono::Utc;
use identity::CredentialStore;
use serde::Deserialize;
use serde_json::{Value, json};

use platform::signing::SigV4Signer;

use crate::application::config::ProgressConfig;
use crate::domain::entities::{CallKind, RemoteCall};
use crate::domain::services::{answer_item, key_attributes};
use crate::domain::transport::{CallOutcome, CallPayload, RemoteFailure, Transport};
use crate::error::{ProgressError, ProgressResult};

const SERVICE: &str = "dynamodb";
const TARGET_PREFIX: &str = "DynamoDB_20120810";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// DynamoDB-backed transport
pub struct DynamoDbTransport {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    table_name: String,
    signer: SigV4Signer,
    credentials: Arc<CredentialStore>,
}

impl DynamoDbTransport {
    pub fn new(config: &ProgressConfig, credentials: Arc<CredentialStore>) -> ProgressResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.call_timeout)
            .build()
            .map_err(|e| ProgressError::Internal(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(client, config, credentials)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &ProgressConfig,
        credentials: Arc<CredentialStore>,
    ) -> ProgressResult<Self> {
        let endpoint = config.endpoint_url();
        let host = host_of(&endpoint)?;
        Ok(Self {
            client,
            endpoint,
            host,
            table_name: config.table_name.clone(),
            signer: SigV4Signer::new(config.region.as_str(), SERVICE),
            credentials,
        })
    }

    fn target(kind: CallKind) -> String {
        let action = match kind {
            CallKind::Read => "GetItem",
            CallKind::Write => "PutItem",
        };
        format!("{TARGET_PREFIX}.{action}")
    }

    fn request_body(&self, call: &RemoteCall) -> Result<Value, RemoteFailure> {
        match (call.kind, &call.answer) {
            (CallKind::Read, _) => Ok(json!({
                "TableName": self.table_name,
                "Key": key_attributes(&call.key),
            })),
            (CallKind::Write, Some(answer)) => Ok(json!({
                "TableName": self.table_name,
                "Item": answer_item(&call.key, answer),
            })),
            (CallKind::Write, None) => Err(RemoteFailure::new(
                "ValidationException",
                "write call without an answer",
            )),
        }
    }
}

impl Transport for DynamoDbTransport {
    async fn send(&self, call: &RemoteCall) -> CallOutcome {
        let Some(credentials) = self.credentials.snapshot() else {
            return CallOutcome::Failure(RemoteFailure::new(
                "CredentialsError",
                "Missing credentials in config",
            ));
        };

        let body = match self.request_body(call) {
            Ok(body) => body.to_string().into_bytes(),
            Err(failure) => return CallOutcome::Failure(failure),
        };
        let target = Self::target(call.kind);

        let signed = self.signer.sign_post(
            &credentials.signing_keys(),
            &self.host,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", target.as_str())],
            &body,
            Utc::now(),
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header("X-Amz-Target", &target);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = match request.body(body).send().await {
            Ok(response) => response,
            Err(err) => return CallOutcome::Failure(network_failure(err)),
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return CallOutcome::Failure(network_failure(err)),
        };

        decode_response(status, &bytes)
    }
}

/// Turn a raw response into a call outcome
fn decode_response(status: u16, body: &[u8]) -> CallOutcome {
    if (200..300).contains(&status) {
        return match serde_json::from_slice::<Value>(body) {
            Ok(data) => CallOutcome::Success(CallPayload::new(data)),
            Err(err) => CallOutcome::Failure(
                RemoteFailure::new("SerializationError", format!("Malformed response body: {err}"))
                    .with_status(status),
            ),
        };
    }

    let failure = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_type: Some(code),
            message,
        }) => RemoteFailure::new(code, message.unwrap_or_default()),
        _ => RemoteFailure::new("UnknownError", format!("HTTP {status}")),
    };
    CallOutcome::Failure(failure.with_status(status))
}

fn network_failure(err: reqwest::Error) -> RemoteFailure {
    let code = if err.is_timeout() {
        "TimeoutError"
    } else {
        "NetworkingError"
    };
    RemoteFailure::new(code, err.to_string())
}

/// `host[:port]` as it will appear in the `Host` header
fn host_of(endpoint: &str) -> ProgressResult<String> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| ProgressError::Internal(format!("invalid endpoint `{endpoint}`: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| ProgressError::Internal(format!("endpoint `{endpoint}` has no host")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
