//! Public trade history

use crate::numeric;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout used by `returnTradeHistory` (always UTC)
const TRADE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Aggressor side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single executed trade
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    /// Exchange-wide trade id
    #[serde(rename = "globalTradeID", deserialize_with = "numeric::integer")]
    pub global_trade_id: u64,
    /// Per-market trade id
    #[serde(rename = "tradeID", deserialize_with = "numeric::integer")]
    pub trade_id: u64,
    /// Execution time
    #[serde(deserialize_with = "trade_date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub side: TradeSide,
    /// Execution price
    #[serde(deserialize_with = "numeric::float")]
    pub rate: f64,
    /// Size in the traded currency
    #[serde(deserialize_with = "numeric::float")]
    pub amount: f64,
    /// `rate * amount`, in the base currency
    #[serde(deserialize_with = "numeric::float")]
    pub total: f64,
}

fn trade_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, TRADE_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid trade date {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_trade_record_parsing() {
        let json = r#"[
            {"globalTradeID": 394604821, "tradeID": 45205037, "date": "2018-10-22 15:49:07",
             "type": "sell", "rate": "0.03140000", "amount": "0.25000000", "total": "0.00785000"},
            {"globalTradeID": "394604820", "tradeID": "45205036", "date": "2018-10-22 15:48:59",
             "type": "buy", "rate": 0.0314, "amount": 1, "total": 0.0314}
        ]"#;
        let trades: Vec<TradeRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].global_trade_id, 394604821);
        assert_eq!(trades[0].side, TradeSide::Sell);
        assert_eq!(trades[0].rate, 0.0314);
        assert_eq!(trades[0].date.year(), 2018);
        assert_eq!(trades[0].date.hour(), 15);
        assert_eq!(trades[1].trade_id, 45205036);
        assert_eq!(trades[1].side, TradeSide::Buy);
        assert_eq!(trades[1].rate, trades[0].rate);
    }

    #[test]
    fn test_bad_date_rejected() {
        let json = r#"{"globalTradeID": 1, "tradeID": 1, "date": "yesterday",
            "type": "buy", "rate": "1", "amount": "1", "total": "1"}"#;
        let err = serde_json::from_str::<TradeRecord>(json).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_unknown_side_rejected() {
        let json = r#"{"globalTradeID": 1, "tradeID": 1, "date": "2018-10-22 15:49:07",
            "type": "short", "rate": "1", "amount": "1", "total": "1"}"#;
        assert!(serde_json::from_str::<TradeRecord>(json).is_err());
    }

    #[test]
    fn test_side_display() {
        assert_eq!(TradeSide::Buy.to_string(), "buy");
        assert_eq!(TradeSide::Sell.to_string(), "sell");
    }
}
