//! Private account endpoints
//!
//! These endpoints require authentication.

use crate::dispatch::{CallKind, Dispatcher, Params};
use crate::error::RestResult;
use poloniex_types::Balances;
use tracing::{debug, instrument};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Get available balances for every currency
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<Balances> {
        debug!("Fetching balances");
        self.dispatcher
            .call(CallKind::Private, "returnBalances", Params::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;
    use crate::transport::MockTransport;
    use poloniex_auth::Credentials;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_balances() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(r#"{"BTC": "0.59098578", "LTC": "3.31117268"}"#);
        let creds = Credentials::new("TEST-KEY", "secret").unwrap();
        let dispatcher = Dispatcher::new(
            transport.clone(),
            "https://poloniex.test/public",
            "https://poloniex.test/tradingApi",
            Some(creds),
        );

        let balances = AccountEndpoints::new(&dispatcher).get_balances().await.unwrap();
        assert_eq!(balances.get("BTC"), Some(0.59098578));

        let request = transport.last_request().unwrap();
        assert!(request.body.unwrap().starts_with("command=returnBalances&nonce="));
    }

    #[tokio::test]
    async fn test_get_balances_requires_credentials() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Dispatcher::new(
            transport.clone(),
            "https://poloniex.test/public",
            "https://poloniex.test/tradingApi",
            None,
        );

        let result = AccountEndpoints::new(&dispatcher).get_balances().await;
        assert!(matches!(result, Err(RestError::AuthRequired)));
        assert!(transport.requests().is_empty());
    }
}
