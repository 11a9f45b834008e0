//! Public market data types

use crate::numeric;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Ticker
// ============================================================================

/// `returnTicker` result: market pair → ticker
pub type Tickers = HashMap<String, Ticker>;

/// Ticker snapshot for one market pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ticker {
    /// Market identifier
    #[serde(deserialize_with = "numeric::integer")]
    pub id: u64,
    /// Last trade price
    #[serde(deserialize_with = "numeric::float")]
    pub last: f64,
    /// Lowest ask on the book
    #[serde(rename = "lowestAsk", deserialize_with = "numeric::float")]
    pub lowest_ask: f64,
    /// Highest bid on the book
    #[serde(rename = "highestBid", deserialize_with = "numeric::float")]
    pub highest_bid: f64,
    /// 24h change as a fraction (0.01 = 1%)
    #[serde(rename = "percentChange", deserialize_with = "numeric::float")]
    pub percent_change: f64,
    /// 24h volume in the base currency
    #[serde(rename = "baseVolume", deserialize_with = "numeric::float")]
    pub base_volume: f64,
    /// 24h volume in the quote currency
    #[serde(rename = "quoteVolume", deserialize_with = "numeric::float")]
    pub quote_volume: f64,
    /// Whether trading is frozen
    #[serde(rename = "isFrozen", deserialize_with = "numeric::flag")]
    pub is_frozen: bool,
    /// 24h high
    #[serde(rename = "high24hr", deserialize_with = "numeric::float")]
    pub high_24h: f64,
    /// 24h low
    #[serde(rename = "low24hr", deserialize_with = "numeric::float")]
    pub low_24h: f64,
}

impl Ticker {
    /// Midpoint between best bid and best ask
    pub fn mid_price(&self) -> f64 {
        (self.lowest_ask + self.highest_bid) / 2.0
    }

    /// Bid/ask spread
    pub fn spread(&self) -> f64 {
        self.lowest_ask - self.highest_bid
    }

    /// Spread in basis points of the mid price, if the book is non-empty
    pub fn spread_bps(&self) -> Option<f64> {
        let mid = self.mid_price();
        if mid > 0.0 {
            Some(self.spread() / mid * 10_000.0)
        } else {
            None
        }
    }
}

// ============================================================================
// Currencies
// ============================================================================

/// `returnCurrencies` result: currency code → details
pub type Currencies = HashMap<String, Currency>;

/// Currency listed on the exchange
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Currency {
    /// Currency identifier
    #[serde(deserialize_with = "numeric::integer")]
    pub id: u64,
    /// Human readable name
    pub name: String,
    /// Withdrawal fee
    #[serde(rename = "txFee", deserialize_with = "numeric::float")]
    pub tx_fee: f64,
    /// Confirmations required before a deposit is credited
    #[serde(rename = "minConf", deserialize_with = "numeric::integer")]
    pub min_confirmations: u32,
    /// Shared deposit address, for currencies that use payment ids
    #[serde(rename = "depositAddress", default)]
    pub deposit_address: Option<String>,
    /// Deposits and withdrawals disabled
    #[serde(deserialize_with = "numeric::flag")]
    pub disabled: bool,
    /// Removed from the exchange
    #[serde(deserialize_with = "numeric::flag")]
    pub delisted: bool,
    /// Trading frozen
    #[serde(deserialize_with = "numeric::flag")]
    pub frozen: bool,
}

impl Currency {
    /// Deposits, withdrawals and trading are all available
    pub fn is_active(&self) -> bool {
        !(self.disabled || self.delisted || self.frozen)
    }
}

// ============================================================================
// Loans
// ============================================================================

/// `returnLoanOrders` result
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoanOrders {
    /// Lending offers
    #[serde(default)]
    pub offers: Vec<Loan>,
    /// Borrowing demands
    #[serde(default)]
    pub demands: Vec<Loan>,
}

/// A single loan offer or demand
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Loan {
    /// Daily interest rate
    #[serde(deserialize_with = "numeric::float")]
    pub rate: f64,
    /// Amount offered or demanded
    #[serde(deserialize_with = "numeric::float")]
    pub amount: f64,
    /// Minimum duration in days
    #[serde(rename = "rangeMin", deserialize_with = "numeric::integer")]
    pub range_min: u32,
    /// Maximum duration in days
    #[serde(rename = "rangeMax", deserialize_with = "numeric::integer")]
    pub range_max: u32,
}

impl LoanOrders {
    /// Lowest offered rate
    pub fn best_offer_rate(&self) -> Option<f64> {
        self.offers.iter().map(|l| l.rate).reduce(f64::min)
    }

    /// Highest demanded rate
    pub fn best_demand_rate(&self) -> Option<f64> {
        self.demands.iter().map(|l| l.rate).reduce(f64::max)
    }
}

// ============================================================================
// Chart data
// ============================================================================

/// Candlestick width accepted by `returnChartData`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    /// 5 minutes
    #[serde(rename = "300")]
    M5,
    /// 15 minutes
    #[serde(rename = "900")]
    M15,
    /// 30 minutes
    #[serde(rename = "1800")]
    M30,
    /// 2 hours
    #[serde(rename = "7200")]
    H2,
    /// 4 hours
    #[serde(rename = "14400")]
    H4,
    /// 1 day
    #[serde(rename = "86400")]
    D1,
}

impl ChartPeriod {
    /// Every supported period, shortest first
    pub const ALL: [ChartPeriod; 6] = [Self::M5, Self::M15, Self::M30, Self::H2, Self::H4, Self::D1];

    /// Period length in seconds
    pub fn as_secs(&self) -> u32 {
        match self {
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1800,
            Self::H2 => 7200,
            Self::H4 => 14400,
            Self::D1 => 86400,
        }
    }

    /// Look up a period by its length in seconds
    pub fn from_secs(secs: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_secs() == secs)
    }
}

impl std::fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

/// One candle from `returnChartData`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartPoint {
    /// Candle open time (Unix seconds)
    #[serde(deserialize_with = "numeric::integer")]
    pub date: u64,
    #[serde(deserialize_with = "numeric::float")]
    pub high: f64,
    #[serde(deserialize_with = "numeric::float")]
    pub low: f64,
    #[serde(deserialize_with = "numeric::float")]
    pub open: f64,
    #[serde(deserialize_with = "numeric::float")]
    pub close: f64,
    /// Volume in the base currency
    #[serde(deserialize_with = "numeric::float")]
    pub volume: f64,
    /// Volume in the quote currency
    #[serde(rename = "quoteVolume", deserialize_with = "numeric::float")]
    pub quote_volume: f64,
    /// Volume-weighted average price
    #[serde(rename = "weightedAverage", deserialize_with = "numeric::float")]
    pub weighted_average: f64,
}

impl ChartPoint {
    /// Poloniex answers an empty range with a single all-zero candle
    pub fn is_placeholder(&self) -> bool {
        self.date == 0
    }
}
