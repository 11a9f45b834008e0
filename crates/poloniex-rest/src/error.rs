//! Error types for REST API operations

use crate::transport::TransportError;
use poloniex_auth::AuthError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The transport failed before a response body was read
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body did not match the expected shape
    #[error("Failed to decode {command} response: {source}")]
    Decode {
        /// Command whose response failed to decode
        command: String,
        /// Underlying JSON error, naming the offending key where known
        #[source]
        source: serde_json::Error,
    },

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Credentials could not sign the request
    #[error("Signing failed: {0}")]
    Auth(#[from] AuthError),

    /// Poloniex answered with an error body
    #[error("API error for {command}: {message}")]
    Api {
        /// Command that was rejected
        command: String,
        /// Message from the `error` field
        message: String,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// Check if the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if a response arrived but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if Poloniex rejected the nonce as already used
    pub fn is_nonce_rejected(&self) -> bool {
        matches!(self, Self::Api { message, .. } if message.to_ascii_lowercase().contains("nonce"))
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
