//! Main REST client implementation

use crate::dispatch::{CallKind, Dispatcher, Params};
use crate::endpoints::{AccountEndpoints, MarketEndpoints};
use crate::error::{RestError, RestResult};
use crate::transport::{HttpTransport, ReqwestTransport};
use poloniex_auth::Credentials;
use poloniex_types::{
    Balances, ChartPeriod, ChartPoint, Currencies, DailyVolume, LoanOrders, OrderBook, OrderBooks,
    Ticker, Tickers, TradeRecord,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Public market data endpoint
pub const PUBLIC_URL: &str = "https://poloniex.com/public";
/// Private trading endpoint
pub const TRADE_URL: &str = "https://poloniex.com/tradingApi";
/// Push API endpoint (not used by this client)
pub const WEBSOCKET_URL: &str = "wss://api.poloniex.com";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("poloniex-rest/", env!("CARGO_PKG_VERSION"));

/// Poloniex REST API client
///
/// Provides access to both public and private endpoints. Cloning is cheap
/// and clones share the transport and the nonce sequence.
///
/// # Example
///
/// ```no_run
/// use poloniex_rest::{Credentials, PoloniexClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = PoloniexClient::new()?;
///     let ticker = client.ticker("BTC_ETH").await?;
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = PoloniexClient::with_credentials(creds)?;
///     let balances = auth_client.balances().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PoloniexClient {
    dispatcher: Dispatcher,
}

impl PoloniexClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
        )?;

        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over a caller-supplied transport
    ///
    /// `timeout_secs` and `user_agent` in `config` are ignored; they only
    /// configure the default reqwest transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: ClientConfig) -> Self {
        info!(
            authenticated = config.credentials.is_some(),
            "Created Poloniex REST client"
        );

        Self {
            dispatcher: Dispatcher::new(
                transport,
                config.public_url,
                config.trade_url,
                config.credentials,
            ),
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.dispatcher.credentials().is_some()
    }

    /// Send any command and decode its response
    ///
    /// Escape hatch for commands without a typed wrapper.
    pub async fn call<T: DeserializeOwned>(
        &self,
        kind: CallKind,
        command: &str,
        params: Params,
    ) -> RestResult<T> {
        self.dispatcher.call(kind, command, params).await
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.dispatcher)
    }

    /// Get tickers for every market
    pub async fn tickers(&self) -> RestResult<Tickers> {
        self.market().get_tickers().await
    }

    /// Get the ticker for one market
    ///
    /// # Arguments
    /// * `pair` - Market pair (e.g., "BTC_ETH")
    pub async fn ticker(&self, pair: &str) -> RestResult<Ticker> {
        self.market().get_ticker(pair).await
    }

    /// Get 24-hour volume per market and in total
    pub async fn daily_volume(&self) -> RestResult<DailyVolume> {
        self.market().get_daily_volume().await
    }

    /// Get the order book for one market
    ///
    /// # Arguments
    /// * `pair` - Market pair
    /// * `depth` - Levels per side (1-100)
    pub async fn order_book(&self, pair: &str, depth: Option<u32>) -> RestResult<OrderBook> {
        self.market().get_order_book(pair, depth).await
    }

    /// Get order books for every market
    pub async fn order_books(&self, depth: Option<u32>) -> RestResult<OrderBooks> {
        self.market().get_order_books(depth).await
    }

    /// Get public trade history for a market
    pub async fn trade_history(
        &self,
        pair: &str,
        start: Option<u64>,
        end: Option<u64>,
    ) -> RestResult<Vec<TradeRecord>> {
        self.market().get_trade_history(pair, start, end).await
    }

    /// Get candlestick data for a market
    pub async fn chart_data(
        &self,
        pair: &str,
        start: u64,
        end: u64,
        period: ChartPeriod,
    ) -> RestResult<Vec<ChartPoint>> {
        self.market().get_chart_data(pair, start, end, period).await
    }

    /// Get every listed currency
    pub async fn currencies(&self) -> RestResult<Currencies> {
        self.market().get_currencies().await
    }

    /// Get loan offers and demands for a currency
    pub async fn loan_orders(&self, currency: &str) -> RestResult<LoanOrders> {
        self.market().get_loan_orders(currency).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        if !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }
        Ok(AccountEndpoints::new(&self.dispatcher))
    }

    /// Get available balances
    pub async fn balances(&self) -> RestResult<Balances> {
        self.account()?.get_balances().await
    }
}

impl std::fmt::Debug for PoloniexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoloniexClient")
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Public endpoint URL
    pub public_url: String,
    /// Trading endpoint URL
    pub trade_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            public_url: PUBLIC_URL.to_string(),
            trade_url: TRADE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Point both endpoints at another host, e.g. a mock server
    ///
    /// `base` has `/public` and `/tradingApi` appended.
    pub fn with_base_url(mut self, base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        self.public_url = format!("{}/public", base);
        self.trade_url = format!("{}/tradingApi", base);
        self
    }
}
