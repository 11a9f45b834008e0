//! Authentication for the Poloniex trading API
//!
//! Private Poloniex commands are POSTed as a form-encoded body carrying a
//! strictly increasing `nonce` and the `command` name. The body is signed
//! with HMAC-SHA512 keyed by the API secret and the hex digest is sent in the
//! `Sign` header alongside the `Key` header.
//!
//! # Example
//!
//! ```no_run
//! use poloniex_auth::{Credentials, RequestSigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!
//!     // Seal a request body; nonce and command are injected
//!     let payload = RequestSigner::new(&creds)?.seal("returnBalances", [("account", "all")])?;
//!     println!("Key: {}", creds.api_key());
//!     println!("Sign: {}", payload.signature());
//!     println!("Body: {}", payload.body());
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod nonce;

pub use credentials::{sign, Credentials, RequestSigner, SignedPayload, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::NonceSource;
