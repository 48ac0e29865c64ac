//! AWS Signature Version 4
//!
//! Signs JSON-protocol `POST /` requests (DynamoDB, Cognito) with temporary
//! credentials. Only the subset needed by the JSON protocols is supported:
//! root path, no query string, single-valued headers.

use chrono::{DateTime, Utc};

use crate::crypto::{hmac_sha256, sha256_hex};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Key material used to sign a request
#[derive(Clone, Copy)]
pub struct SigningKeys<'a> {
    pub access_key_id: &'a str,
    pub secret_key: &'a str,
    /// Present for temporary (STS / Cognito) credentials
    pub session_token: Option<&'a str>,
}

impl std::fmt::Debug for SigningKeys<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.map(|_| "<redacted>"))
            .finish()
    }
}

/// Region + service pair a signature is scoped to
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    region: String,
    service: String,
}

impl SigV4Signer {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    /// Sign a `POST /` request
    ///
    /// ## Arguments
    /// * `keys` - Credentials to sign with
    /// * `host` - Value of the `Host` header (must match the request URL)
    /// * `headers` - Additional headers that are sent and must be signed
    ///   (e.g. `content-type`, `x-amz-target`)
    /// * `body` - Exact request body bytes
    /// * `now` - Signing time
    ///
    /// ## Returns
    /// Headers to add to the request: `x-amz-date`, `x-amz-security-token`
    /// (when a session token is present) and `authorization`.
    pub fn sign_post(
        &self,
        keys: &SigningKeys<'_>,
        host: &str,
        headers: &[(&str, &str)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Vec<(String, String)> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let mut signed: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        signed.push(("host".to_string(), host.to_string()));
        signed.push(("x-amz-date".to_string(), amz_date.clone()));
        if let Some(token) = keys.session_token {
            signed.push(("x-amz-security-token".to_string(), token.to_string()));
        }
        signed.sort_by(|a, b| a.0.cmp(&b.0));

        let signed_header_names = signed
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        let canonical_request = format!(
            "POST\n/\n\n{canonical_headers}\n{signed_header_names}\n{}",
            sha256_hex(body)
        );

        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let signing_key = self.signing_key(keys.secret_key, &date);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_header_names}, Signature={signature}",
            keys.access_key_id
        );

        let mut out = vec![("x-amz-date".to_string(), amz_date)];
        if let Some(token) = keys.session_token {
            out.push(("x-amz-security-token".to_string(), token.to_string()));
        }
        out.push(("authorization".to_string(), authorization));
        out
    }

    /// Derive the per-day signing key
    fn signing_key(&self, secret_key: &str, date: &str) -> [u8; 32] {
        let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}
