//! Typed responses for the Poloniex REST API
//!
//! This crate holds the result types returned by `poloniex-rest` together
//! with the decoding rules Poloniex payloads need. It has no networking and
//! can be used on its own to decode captured responses.
//!
//! # Key Types
//!
//! - [`Ticker`], [`Currency`], [`LoanOrders`], [`ChartPoint`] - fixed-schema market data
//! - [`OrderBook`], [`BookLevel`] - order book snapshots with positional rows
//! - [`TradeRecord`] - public trade history
//! - [`DailyVolume`] - 24h volume, mixing per-market maps with reserved total keys
//! - [`Balances`] - private account balances
//!
//! # Numbers
//!
//! Poloniex encodes numbers as JSON strings on most endpoints and as bare
//! JSON numbers on others. All numeric fields accept both; see [`numeric`].

pub mod account;
pub mod book;
pub mod market;
pub mod numeric;
pub mod trade;
pub mod volume;

pub use account::Balances;
pub use book::{BookLevel, OrderBook, OrderBooks};
pub use market::{ChartPeriod, ChartPoint, Currencies, Currency, Loan, LoanOrders, Ticker, Tickers};
pub use numeric::Amount;
pub use trade::{TradeRecord, TradeSide};
pub use volume::{is_reserved_key, DailyVolume, MarketVolume, RESERVED_TOTAL_KEYS};
