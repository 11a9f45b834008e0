//! REST API client for the Poloniex cryptocurrency exchange
//!
//! This crate provides typed access to Poloniex's public market data and
//! signed access to its private trading API.
//!
//! # Features
//!
//! - **Market Data**: Tickers, order books, trade history, chart data
//! - **Volume**: 24h volume per market alongside the aggregate totals
//! - **Reference Data**: Currencies, loan offers and demands
//! - **Account**: Balances, plus [`PoloniexClient::call`] for any other command
//!
//! # Authentication
//!
//! Private commands require API credentials. The client injects a strictly
//! increasing nonce and the command name, form-encodes the body once and
//! signs exactly those bytes with HMAC-SHA512.
//!
//! # Example
//!
//! ```no_run
//! use poloniex_rest::{Credentials, PoloniexClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = PoloniexClient::new()?;
//!     let volume = client.daily_volume().await?;
//!     println!("24h BTC volume: {:?}", volume.total_btc);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = PoloniexClient::with_credentials(creds)?;
//!     let balances = auth_client.balances().await?;
//!     println!("BTC balance: {:?}", balances.get("BTC"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Failures are never retried. Transport problems surface as
//! [`RestError::Transport`], malformed bodies as [`RestError::Decode`] and
//! error bodies from Poloniex as [`RestError::Api`].

pub mod client;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod transport;

// Re-export main types
pub use client::{ClientConfig, PoloniexClient, PUBLIC_URL, TRADE_URL, WEBSOCKET_URL};
pub use dispatch::{params, CallKind, Dispatcher, Params};
pub use error::{RestError, RestResult};
pub use poloniex_auth::Credentials;
pub use transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export response types
pub use poloniex_types::{
    // Market data
    BookLevel, ChartPeriod, ChartPoint, Currencies, Currency, DailyVolume, Loan, LoanOrders,
    OrderBook, OrderBooks, Ticker, Tickers, TradeRecord, TradeSide,
    // Account
    Balances,
};
