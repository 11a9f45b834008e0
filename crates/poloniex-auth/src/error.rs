//! Error types for authentication operations

/// Errors that can occur while preparing authenticated requests
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Nonce counter reached `u64::MAX`; no greater nonce can be issued
    #[error("Nonce space exhausted")]
    NonceExhausted,

    /// Request parameters could not be form-encoded
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
