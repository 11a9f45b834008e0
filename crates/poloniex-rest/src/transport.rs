//! HTTP transport abstraction
//!
//! The dispatcher never talks to the network directly; it hands a fully
//! built [`HttpRequest`] to an [`HttpTransport`] and gets raw body bytes
//! back. This keeps signing and decoding testable without real network
//! calls.
//!
//! # Example
//!
//! ```no_run
//! use poloniex_rest::transport::{HttpRequest, HttpTransport, ReqwestTransport, TransportError};
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), TransportError> {
//!     let transport = ReqwestTransport::new(Duration::from_secs(30), "poloniex-rest/0.1.0")?;
//!     let body = transport
//!         .execute(HttpRequest::get("https://poloniex.com/public?command=returnTicker"))
//!         .await?;
//!     println!("Received {} bytes", body.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not reach the server
    #[error("connection failed: {0}")]
    Connect(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Request failed after connecting
    #[error("request failed: {0}")]
    Request(String),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// HTTP method of an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read-only public call
    Get,
    /// State-changing private call
    Post,
}

/// A fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A GET request with no body
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request carrying `body`
    pub fn post(url: impl Into<String>, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Trait for HTTP transport abstraction
///
/// Implementations execute the request as given and return the raw
/// response body. HTTP status codes are not interpreted: Poloniex reports
/// failures in the JSON body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute `request` and return the response body
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError>;
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::from_reqwest)?;

        debug!(%status, len = bytes.len(), "Received response");
        Ok(bytes.to_vec())
    }
}

/// Mock transport for testing
///
/// Returns queued responses in order and records every request it sees.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
    unreachable: bool,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport with no queued responses
    pub fn new() -> Self {
        Self {
            responses: parking_lot::Mutex::new(std::collections::VecDeque::new()),
            requests: parking_lot::Mutex::new(Vec::new()),
            unreachable: false,
        }
    }

    /// A transport whose every request fails to connect
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    /// Queue a response body
    pub fn push_response(&self, body: impl Into<String>) {
        self.responses.lock().push_back(Ok(body.into().into_bytes()));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        if self.unreachable {
            return Err(TransportError::Connect("mock host unreachable".into()));
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no mock response queued".into())))
    }
}
