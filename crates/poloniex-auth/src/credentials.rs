//! Authentication credentials for the Poloniex trading API
//!
//! Implements HMAC-SHA512 signing as required by Poloniex's private
//! endpoints: the signature is the lowercase hex HMAC of the exact
//! form-encoded request body, keyed with the API secret.
//!
//! # Security
//!
//! Secrets are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha512;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::nonce::NonceSource;

type HmacSha512 = Hmac<Sha512>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "POLONIEX_API_KEY";
/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "POLONIEX_API_SECRET";

/// Sign `body` with `secret`
///
/// Returns the lowercase hex HMAC-SHA512 digest. A fresh MAC is built on
/// every call, so no digest state survives between requests.
pub fn sign(secret: &[u8], body: &[u8]) -> AuthResult<String> {
    let mut mac = HmacSha512::new_from_slice(secret)
        .map_err(|e| AuthError::InvalidCredentials(format!("Unusable secret: {}", e)))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// API credentials for authenticated requests
///
/// Secrets are automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory. Clones share one
/// [`NonceSource`], so every request made with the same key draws from the
/// same increasing sequence.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// API secret (zeroized on drop)
    secret: SecretBox<Vec<u8>>,
    /// Nonces issued for this key
    nonces: Arc<NonceSource>,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    ///
    /// # Arguments
    /// * `api_key` - Your Poloniex API key
    /// * `secret` - Your API secret, used verbatim as HMAC key material
    ///
    /// # Returns
    /// Result containing Credentials or error if either part is empty
    pub fn new(api_key: impl Into<String>, secret: impl AsRef<[u8]>) -> AuthResult<Self> {
        Self::with_nonce_source(api_key, secret, NonceSource::new())
    }

    /// Create credentials that continue from an existing nonce source
    pub fn with_nonce_source(
        api_key: impl Into<String>,
        secret: impl AsRef<[u8]>,
        nonces: NonceSource,
    ) -> AuthResult<Self> {
        let api_key = api_key.into();
        let secret = secret.as_ref();

        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if secret.is_empty() {
            return Err(AuthError::InvalidCredentials("API secret is empty".to_string()));
        }

        Ok(Self {
            api_key,
            secret: SecretBox::new(Box::new(secret.to_vec())),
            nonces: Arc::new(nonces),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `POLONIEX_API_KEY` and `POLONIEX_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_SECRET_ENV.to_string()))?;

        Self::new(api_key, secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Draw the next nonce for this key
    pub fn next_nonce(&self) -> AuthResult<u64> {
        self.nonces.next()
    }

    /// Sign a form-encoded body with this key's secret
    pub fn sign(&self, body: &[u8]) -> AuthResult<String> {
        // expose_secret() provides controlled access to the key
        sign(self.secret.expose_secret(), body)
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
            nonces: Arc::clone(&self.nonces),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible = self
            .api_key
            .char_indices()
            .nth(8)
            .map_or(self.api_key.as_str(), |(idx, _)| &self.api_key[..idx]);
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A form-encoded request body together with its signature
///
/// The body can only leave this type together with the signature that
/// was computed over it, so what is sent is always what was signed.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    body: String,
    signature: String,
    nonce: u64,
}

impl SignedPayload {
    /// The form-encoded body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Hex HMAC-SHA512 of [`body`](Self::body)
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Nonce embedded in the body
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Body length in bytes, for the `Content-Length` header
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Split into `(body, signature)`
    pub fn into_parts(self) -> (String, String) {
        (self.body, self.signature)
    }
}

/// Request signer for building authenticated requests
///
/// Each signer owns one freshly drawn nonce and produces exactly one
/// [`SignedPayload`].
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    nonce: u64,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer, drawing a nonce from the credentials
    pub fn new(credentials: &'a Credentials) -> AuthResult<Self> {
        Ok(Self {
            credentials,
            nonce: credentials.next_nonce()?,
        })
    }

    /// Get the nonce for this request
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Inject `nonce` and `command` into `params`, form-encode once and sign
    ///
    /// Caller-supplied `nonce` or `command` entries are replaced.
    pub fn seal<I, K, V>(self, command: &str, params: I) -> AuthResult<SignedPayload>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        fields.insert("nonce".to_string(), self.nonce.to_string());
        fields.insert("command".to_string(), command.to_string());

        let body = serde_urlencoded::to_string(&fields)?;
        let signature = self.credentials.sign(body.as_bytes())?;

        debug!(command, nonce = self.nonce, len = body.len(), "Sealed private request");

        Ok(SignedPayload {
            body,
            signature,
            nonce: self.nonce,
        })
    }
}
