//! Request signing for the exchange's authenticated REST API.
//!
//! Every call carries four headers derived from the credential. The
//! signature is `base64(HMAC-SHA256(base64-decode(secret),
//! timestamp + method + path + body))` with a fresh wall-clock timestamp
//! per request, so captured signatures cannot be replayed later.

use crate::error::{ClientError, ClientResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::fmt;
use std::path::Path;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_SIGN: &str = "CB-ACCESS-SIGN";
pub const HEADER_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
pub const HEADER_KEY: &str = "CB-ACCESS-KEY";
pub const HEADER_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";

/// The four header values attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub signature: String,
    pub timestamp: String,
    pub key: String,
    pub passphrase: String,
}

/// API credential, loaded once at startup and owned by the client.
///
/// The secret is a base64-encoded HMAC key. It is only decoded while a
/// signature is being computed, and the decoded bytes are zeroized on drop.
#[derive(Clone, Deserialize)]
pub struct Credential {
    #[serde(rename = "API_KEY")]
    api_key: String,
    #[serde(rename = "API_SECRET")]
    api_secret: String,
    #[serde(rename = "API_PASS")]
    passphrase: String,
}

impl Credential {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Read the credential file: a JSON object with `API_KEY`, `API_SECRET`
    /// and `API_PASS`. A missing or malformed file is fatal at startup.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ClientError::InvalidCredential(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ClientError::InvalidCredential(format!(
                "malformed credential file {}: {e}",
                path.display()
            ))
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Deterministic signature for a fixed timestamp and request parts.
    ///
    /// The `path` must include the query string, exactly as sent.
    pub fn sign_at(
        &self,
        timestamp: &str,
        method: &str,
        path: &str,
        body: &str,
    ) -> ClientResult<String> {
        let secret = Zeroizing::new(STANDARD.decode(&self.api_secret).map_err(|e| {
            ClientError::InvalidCredential(format!("API secret is not valid base64: {e}"))
        })?);

        let mut mac = HmacSha256::new_from_slice(&secret)
            .map_err(|e| ClientError::InvalidCredential(e.to_string()))?;
        mac.update(timestamp.as_bytes());
        mac.update(method.as_bytes());
        mac.update(path.as_bytes());
        mac.update(body.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Produce the four auth headers, stamping a fresh coarse wall-clock
    /// timestamp (whole seconds, decimal string).
    pub fn auth_headers(&self, method: &str, path: &str, body: &str) -> ClientResult<AuthHeaders> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign_at(&timestamp, method, path, body)?;
        Ok(AuthHeaders {
            signature,
            timestamp,
            key: self.api_key.clone(),
            passphrase: self.passphrase.clone(),
        })
    }
}

// Secret material stays out of debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
