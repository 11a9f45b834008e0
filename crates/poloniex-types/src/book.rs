//! Order book snapshots

use crate::numeric::{self, Amount};
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// `returnOrderBook` with `currencyPair=all`: market pair → book
pub type OrderBooks = HashMap<String, OrderBook>;

/// Order book snapshot for one market pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderBook {
    /// Ask levels, best (lowest) first
    pub asks: Vec<BookLevel>,
    /// Bid levels, best (highest) first
    pub bids: Vec<BookLevel>,
    /// Whether the market is frozen (absent means trading)
    #[serde(rename = "isFrozen", default, deserialize_with = "numeric::flag")]
    pub is_frozen: bool,
    /// Book sequence number
    #[serde(default, deserialize_with = "numeric::integer")]
    pub seq: u64,
}

impl OrderBook {
    /// Best ask price
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|level| level.price)
    }

    /// Best bid price
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|level| level.price)
    }

    /// Difference between best ask and best bid
    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Total size resting on the ask side
    pub fn ask_depth(&self) -> f64 {
        self.asks.iter().map(|level| level.amount).sum()
    }

    /// Total size resting on the bid side
    pub fn bid_depth(&self) -> f64 {
        self.bids.iter().map(|level| level.amount).sum()
    }
}

/// A single price level
///
/// On the wire this is a positional array `[price, amount]`, optionally
/// followed by a marker element.
#[derive(Debug, Clone, PartialEq)]
pub struct BookLevel {
    pub price: f64,
    pub amount: f64,
    /// Trailing marker element, if the row carried one
    pub marker: Option<String>,
}

impl BookLevel {
    /// Create a level without a marker
    pub fn new(price: f64, amount: f64) -> Self {
        Self {
            price,
            amount,
            marker: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Marker {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<Marker> for String {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Text(s) => s,
            Marker::Number(n) => n.to_string(),
            Marker::Flag(b) => b.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for BookLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = BookLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an order book row [price, amount] or [price, amount, marker]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<BookLevel, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let price: Amount = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let amount: Amount = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let marker: Option<Marker> = seq.next_element()?;

                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(BookLevel {
                    price: price.value(),
                    amount: amount.value(),
                    marker: marker.map(String::from),
                })
            }
        }

        deserializer.deserialize_seq(LevelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_JSON: &str = r#"{
        "asks": [["0.02433", 1.5], ["0.02434", "2.25"]],
        "bids": [["0.02429", 3], [0.02428, "0.5", "m"]],
        "isFrozen": "0",
        "seq": 18849
    }"#;

    #[test]
    fn test_order_book_positional_rows() {
        let book: OrderBook = serde_json::from_str(BOOK_JSON).unwrap();

        assert_eq!(book.asks.len(), 2);
        assert_eq!(book.asks[0], BookLevel::new(0.02433, 1.5));
        assert_eq!(book.asks[1].amount, 2.25);
        assert_eq!(book.bids[1].price, 0.02428);
        assert_eq!(book.bids[1].marker.as_deref(), Some("m"));
        assert_eq!(book.seq, 18849);
        assert!(!book.is_frozen);
    }

    #[test]
    fn test_order_book_helpers() {
        let book: OrderBook = serde_json::from_str(BOOK_JSON).unwrap();

        assert_eq!(book.best_ask(), Some(0.02433));
        assert_eq!(book.best_bid(), Some(0.02429));
        assert!(book.spread().unwrap() > 0.0);
        assert_eq!(book.ask_depth(), 3.75);
        assert_eq!(book.bid_depth(), 3.5);
    }

    #[test]
    fn test_book_without_status_fields() {
        let json = r#"{"asks": [["0.02433", 1.5]], "bids": [["0.02429", 3]]}"#;
        let book: OrderBook = serde_json::from_str(json).unwrap();

        assert!(!book.is_frozen);
        assert_eq!(book.seq, 0);
        assert_eq!(book.best_ask(), Some(0.02433));
        assert_eq!(book.best_bid(), Some(0.02429));
    }

    #[test]
    fn test_numeric_marker_stringified() {
        let level: BookLevel = serde_json::from_str(r#"["1.0", "2.0", 7]"#).unwrap();
        assert_eq!(level.marker.as_deref(), Some("7"));
    }

    #[test]
    fn test_row_length_enforced() {
        assert!(serde_json::from_str::<BookLevel>(r#"["1.0"]"#).is_err());
        assert!(serde_json::from_str::<BookLevel>(r#"[]"#).is_err());
        assert!(serde_json::from_str::<BookLevel>(r#"["1.0", "2.0", "m", "x"]"#).is_err());
    }

    #[test]
    fn test_row_must_be_array() {
        assert!(serde_json::from_str::<BookLevel>(r#"{"price": "1.0", "amount": "2.0"}"#).is_err());
    }

    #[test]
    fn test_bad_price_fails_whole_book() {
        let json = r#"{"asks": [["abc", 1]], "bids": [], "isFrozen": "0", "seq": 1}"#;
        assert!(serde_json::from_str::<OrderBook>(json).is_err());
    }

    #[test]
    fn test_all_books() {
        let json = format!(r#"{{"BTC_ETH": {}, "BTC_XMR": {}}}"#, BOOK_JSON, BOOK_JSON);
        let books: OrderBooks = serde_json::from_str(&json).unwrap();
        assert_eq!(books.len(), 2);
        assert!(books.contains_key("BTC_XMR"));
    }
}
