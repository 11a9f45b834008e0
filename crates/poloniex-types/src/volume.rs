//! 24-hour volume decoding
//!
//! `return24hVolume` mixes two shapes in one JSON object:
//!
//! ```json
//! {
//!     "BTC_ETH": {"BTC": "1.2", "ETH": "2.3"},
//!     "BTC_XMR": {"BTC": "0.4", "XMR": "12.0"},
//!     "totalBTC": "100.5",
//!     "totalETH": "210.0"
//! }
//! ```
//!
//! Keys listed in [`RESERVED_TOTAL_KEYS`] carry a single aggregate number;
//! every other key is a market pair holding a currency → volume map. Each
//! value is captured as a [`RawValue`] first and only decoded once its key
//! has been classified. A repeated key, whether a market, a total or a
//! currency inside one market, fails the whole decode.

use crate::numeric::{self, Amount};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::fmt;

/// Top-level keys that hold aggregate totals rather than market data
pub const RESERVED_TOTAL_KEYS: [&str; 5] = ["totalBTC", "totalETH", "totalUSDC", "totalUSDT", "totalXMR"];

/// Per-market volume: counter currency → traded volume
pub type MarketVolume = HashMap<String, f64>;

/// 24-hour volume snapshot across all markets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyVolume {
    /// Aggregate volume denominated in BTC
    pub total_btc: Option<f64>,
    /// Aggregate volume denominated in ETH
    pub total_eth: Option<f64>,
    /// Aggregate volume denominated in USDC
    pub total_usdc: Option<f64>,
    /// Aggregate volume denominated in USDT
    pub total_usdt: Option<f64>,
    /// Aggregate volume denominated in XMR
    pub total_xmr: Option<f64>,
    /// Market pair (e.g. `BTC_ETH`) → per-currency volume
    pub volumes: HashMap<String, MarketVolume>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TotalField {
    Btc,
    Eth,
    Usdc,
    Usdt,
    Xmr,
}

impl TotalField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "totalBTC" => Some(Self::Btc),
            "totalETH" => Some(Self::Eth),
            "totalUSDC" => Some(Self::Usdc),
            "totalUSDT" => Some(Self::Usdt),
            "totalXMR" => Some(Self::Xmr),
            _ => None,
        }
    }
}

/// Returns true if `key` is one of the aggregate total fields
pub fn is_reserved_key(key: &str) -> bool {
    TotalField::from_key(key).is_some()
}

impl DailyVolume {
    /// Aggregate total for a currency code (`"BTC"`, `"USDT"`, ...)
    pub fn total(&self, currency: &str) -> Option<f64> {
        match currency {
            "BTC" => self.total_btc,
            "ETH" => self.total_eth,
            "USDC" => self.total_usdc,
            "USDT" => self.total_usdt,
            "XMR" => self.total_xmr,
            _ => None,
        }
    }

    /// Volume breakdown for one market pair
    pub fn market(&self, pair: &str) -> Option<&MarketVolume> {
        self.volumes.get(pair)
    }

    /// Volume of `currency` traded in `pair`
    pub fn volume(&self, pair: &str, currency: &str) -> Option<f64> {
        self.volumes.get(pair)?.get(currency).copied()
    }

    fn total_slot(&mut self, field: TotalField) -> &mut Option<f64> {
        match field {
            TotalField::Btc => &mut self.total_btc,
            TotalField::Eth => &mut self.total_eth,
            TotalField::Usdc => &mut self.total_usdc,
            TotalField::Usdt => &mut self.total_usdt,
            TotalField::Xmr => &mut self.total_xmr,
        }
    }

    /// Decode one top-level entry into the snapshot
    fn absorb(&mut self, key: String, raw: &RawValue) -> Result<(), String> {
        match TotalField::from_key(&key) {
            Some(field) => {
                let mut de = serde_json::Deserializer::from_str(raw.get());
                let value = numeric::float(&mut de)
                    .map_err(|e| format!("invalid total for `{}`: {}", key, e))?;

                let slot = self.total_slot(field);
                if slot.is_some() {
                    return Err(format!("duplicate key `{}`", key));
                }
                *slot = Some(value);
            }
            None => {
                let MarketEntry(market) = serde_json::from_str(raw.get())
                    .map_err(|e| format!("invalid volume map for market `{}`: {}", key, e))?;

                if self.volumes.contains_key(&key) {
                    return Err(format!("duplicate key `{}`", key));
                }
                self.volumes.insert(key, market);
            }
        }
        Ok(())
    }
}

/// One market's currency map, rejecting repeated currencies
struct MarketEntry(MarketVolume);

impl<'de> Deserialize<'de> for MarketEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarketVisitor;

        impl<'de> Visitor<'de> for MarketVisitor {
            type Value = MarketEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a currency to volume object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<MarketEntry, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut volumes = MarketVolume::new();
                while let Some(currency) = map.next_key::<String>()? {
                    let amount: Amount = map.next_value()?;
                    if volumes.contains_key(&currency) {
                        return Err(de::Error::custom(format!("duplicate currency `{}`", currency)));
                    }
                    volumes.insert(currency, amount.value());
                }
                Ok(MarketEntry(volumes))
            }
        }

        deserializer.deserialize_map(MarketVisitor)
    }
}

impl<'de> Deserialize<'de> for DailyVolume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VolumeVisitor;

        impl<'de> Visitor<'de> for VolumeVisitor {
            type Value = DailyVolume;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 24h volume object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<DailyVolume, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut snapshot = DailyVolume::default();
                while let Some(key) = map.next_key::<String>()? {
                    let raw: Box<RawValue> = map.next_value()?;
                    snapshot.absorb(key, &raw).map_err(de::Error::custom)?;
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(VolumeVisitor)
    }
}
