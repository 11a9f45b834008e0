//! Request dispatch
//!
//! Every Poloniex call is a named command. Public commands go out as a GET
//! with the command in the query string; private commands are sealed by
//! [`RequestSigner`] and POSTed to the trading endpoint. Either way the raw
//! body comes back through the [`HttpTransport`] and is decoded straight
//! into the caller's type.

use crate::error::{RestError, RestResult};
use crate::transport::{HttpRequest, HttpTransport};
use poloniex_auth::{Credentials, RequestSigner};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Content type of signed request bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Command parameters: name → value
pub type Params = BTreeMap<String, String>;

/// Whether a command needs authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Unauthenticated market data
    Public,
    /// Signed trading or account command
    Private,
}

/// Error body Poloniex returns in place of a result
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorEnvelope {
    error: String,
}

/// Builds, signs and sends commands, then decodes the responses
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    public_url: String,
    trade_url: String,
    credentials: Option<Credentials>,
}

impl Dispatcher {
    /// Create a dispatcher over `transport`
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        public_url: impl Into<String>,
        trade_url: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport,
            public_url: public_url.into(),
            trade_url: trade_url.into(),
            credentials,
        }
    }

    /// Credentials used for private commands, if any
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Send `command` and decode the response into `T`
    #[instrument(skip(self, params))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        kind: CallKind,
        command: &str,
        params: Params,
    ) -> RestResult<T> {
        let request = match kind {
            CallKind::Public => self.public_request(command, params)?,
            CallKind::Private => self.private_request(command, params)?,
        };

        debug!("Dispatching {} to {}", command, request.url);

        let body = self.transport.execute(request).await?;
        decode(command, &body)
    }

    /// `GET {public_url}?command={command}&{params}`
    pub fn public_request(&self, command: &str, params: Params) -> RestResult<HttpRequest> {
        let mut query: Vec<(String, String)> = vec![("command".to_string(), command.to_string())];
        query.extend(params.into_iter().filter(|(name, _)| name != "command"));

        let query = serde_urlencoded::to_string(&query)
            .map_err(|e| RestError::InvalidParameter(e.to_string()))?;

        Ok(HttpRequest::get(format!("{}?{}", self.public_url, query)))
    }

    /// Signed `POST {trade_url}` with `nonce` and `command` injected
    pub fn private_request(&self, command: &str, params: Params) -> RestResult<HttpRequest> {
        let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;

        let payload = RequestSigner::new(credentials)?.seal(command, params)?;
        let content_length = payload.content_length();
        let (body, signature) = payload.into_parts();

        Ok(HttpRequest::post(self.trade_url.as_str(), body)
            .with_header("Key", credentials.api_key())
            .with_header("Sign", signature)
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_header("Content-Length", content_length.to_string()))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("public_url", &self.public_url)
            .field("trade_url", &self.trade_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Decode a response body, surfacing Poloniex error envelopes as [`RestError::Api`]
pub fn decode<T: DeserializeOwned>(command: &str, body: &[u8]) -> RestResult<T> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return Err(RestError::Api {
            command: command.to_string(),
            message: envelope.error,
        });
    }

    serde_json::from_slice(body).map_err(|source| RestError::Decode {
        command: command.to_string(),
        source,
    })
}

/// Build [`Params`] from name/value pairs
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpMethod, MockTransport, TransportError};
    use poloniex_types::{DailyVolume, Tickers};

    const PUBLIC: &str = "https://poloniex.test/public";
    const TRADE: &str = "https://poloniex.test/tradingApi";
    const SECRET: &str = "b6f2a08e1c9d4e7fa3c5b7d9e1f3a5c7e9b1d3f5a7c9e1b3d5f7a9c1e3b5d7f9";

    fn dispatcher(transport: Arc<MockTransport>, with_credentials: bool) -> Dispatcher {
        let credentials = with_credentials.then(|| Credentials::new("TEST-KEY", SECRET).unwrap());
        Dispatcher::new(transport, PUBLIC, TRADE, credentials)
    }

    #[tokio::test]
    async fn test_public_call_uses_query_string() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response("[]");
        let dispatcher = dispatcher(transport.clone(), false);

        let _: Vec<serde_json::Value> = dispatcher
            .call(
                CallKind::Public,
                "returnTradeHistory",
                params([("currencyPair", "BTC_ETH"), ("start", "1410158341")]),
            )
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://poloniex.test/public?command=returnTradeHistory&currencyPair=BTC_ETH&start=1410158341"
        );
        assert!(request.body.is_none());
        assert!(request.header("Key").is_none());
        assert!(request.header("Sign").is_none());
    }

    #[tokio::test]
    async fn test_private_call_is_signed() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(r#"{"BTC": "0.5"}"#);
        let dispatcher = dispatcher(transport.clone(), true);

        let _: serde_json::Value = dispatcher
            .call(CallKind::Private, "returnBalances", Params::new())
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        let body = request.body.clone().unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, TRADE);
        assert!(body.starts_with("command=returnBalances&nonce="));
        assert_eq!(request.header("Key"), Some("TEST-KEY"));
        assert_eq!(request.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(request.header("Content-Length"), Some(body.len().to_string().as_str()));

        let expected = poloniex_auth::sign(SECRET.as_bytes(), body.as_bytes()).unwrap();
        assert_eq!(request.header("Sign"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_sequential_private_calls_differ() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response("{}");
        transport.push_response("{}");
        let dispatcher = dispatcher(transport.clone(), true);

        for _ in 0..2 {
            let _: serde_json::Value = dispatcher
                .call(CallKind::Private, "returnBalances", Params::new())
                .await
                .unwrap();
        }

        let requests = transport.requests();
        assert_ne!(requests[0].body, requests[1].body);
        assert_ne!(requests[0].header("Sign"), requests[1].header("Sign"));
    }

    #[tokio::test]
    async fn test_private_call_without_credentials() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = dispatcher(transport.clone(), false);

        let result: RestResult<serde_json::Value> = dispatcher
            .call(CallKind::Private, "returnBalances", Params::new())
            .await;

        assert!(matches!(result, Err(RestError::AuthRequired)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_nonces_never_sent() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response("{}");
        let nonces = poloniex_auth::NonceSource::starting_after(u64::MAX);
        let credentials = Credentials::with_nonce_source("TEST-KEY", SECRET, nonces).unwrap();
        let dispatcher = Dispatcher::new(transport.clone(), PUBLIC, TRADE, Some(credentials));

        let result: RestResult<serde_json::Value> = dispatcher
            .call(CallKind::Private, "returnBalances", Params::new())
            .await;

        assert!(matches!(
            result,
            Err(RestError::Auth(poloniex_auth::AuthError::NonceExhausted))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(r#"{"error": "Invalid currency pair."}"#);
        let dispatcher = dispatcher(transport, false);

        let result: RestResult<Tickers> = dispatcher
            .call(CallKind::Public, "returnOrderBook", params([("currencyPair", "NOPE")]))
            .await;

        match result {
            Err(RestError::Api { command, message }) => {
                assert_eq!(command, "returnOrderBook");
                assert_eq!(message, "Invalid currency pair.");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decode_error_carries_key() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(r#"{"BTC_ETH": {"BTC": "1.2"}, "totalBTC": "abc"}"#);
        let dispatcher = dispatcher(transport, false);

        let result: RestResult<DailyVolume> = dispatcher
            .call(CallKind::Public, "return24hVolume", Params::new())
            .await;

        let err = result.unwrap_err();
        assert!(err.is_decode());
        assert!(std::error::Error::source(&err).unwrap().to_string().contains("totalBTC"));
    }

    #[tokio::test]
    async fn test_transport_error_surfaces() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(TransportError::Timeout);
        let dispatcher = dispatcher(transport, false);

        let result: RestResult<Tickers> = dispatcher
            .call(CallKind::Public, "returnTicker", Params::new())
            .await;

        assert!(matches!(result, Err(RestError::Transport(TransportError::Timeout))));
    }

    #[test]
    fn test_error_key_alongside_data_is_not_an_envelope() {
        let body = br#"{"error": "x", "BTC_ETH": {"BTC": "1"}}"#;
        let result: RestResult<serde_json::Value> = decode("return24hVolume", body);
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let result: RestResult<Tickers> = decode("returnTicker", b"<html>502</html>");
        assert!(matches!(result, Err(RestError::Decode { .. })));
    }

    #[test]
    fn test_public_request_ignores_command_param() {
        let dispatcher = dispatcher(Arc::new(MockTransport::new()), false);
        let request = dispatcher
            .public_request("returnTicker", params([("command", "other")]))
            .unwrap();
        assert_eq!(request.url, "https://poloniex.test/public?command=returnTicker");
    }
}
