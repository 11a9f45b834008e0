//! Lenient numeric decoding
//!
//! Poloniex is inconsistent about how it encodes numbers: most market data
//! arrives as JSON strings (`"0.02431"`), while some fields on the same
//! endpoint are bare JSON numbers (`0.02431`). Every numeric field in this
//! crate goes through the helpers below so both encodings decode to the
//! identical value.
//!
//! String values are parsed with the standard library's correctly rounded
//! float parser, and `serde_json` is built with `float_roundtrip`, so neither
//! path loses precision relative to the literal on the wire.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Deserialize an `f64` from either a JSON string or a JSON number
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => parse_float(&s).map_err(D::Error::custom),
        StringOrNumber::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("number {} is not representable as f64", n))),
    }
}

/// Deserialize an unsigned integer from either a JSON string or a JSON number
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", s, e))),
        StringOrNumber::Number(n) => n
            .as_u64()
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("integer {} out of range", n))),
    }
}

/// Deserialize a `0`/`1` flag (string or number) into a `bool`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: u64 = integer(deserializer)?;
    Ok(value != 0)
}

fn parse_float(s: &str) -> Result<f64, String> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid number {:?}: {}", s, e))?;

    // "NaN" and "inf" parse successfully but never appear in market data
    if !value.is_finite() {
        return Err(format!("non-finite number {:?}", s));
    }
    Ok(value)
}

/// An `f64` that accepts either JSON encoding
///
/// Useful as a map value type, where `deserialize_with` can't reach.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(pub f64);

impl Amount {
    /// The decoded value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        float(deserializer).map(Amount)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "float")]
        value: f64,
        #[serde(deserialize_with = "integer")]
        count: u32,
        #[serde(deserialize_with = "flag")]
        frozen: bool,
    }

    #[test]
    fn test_string_and_number_decode_identically() {
        let from_string: Sample =
            serde_json::from_str(r#"{"value": "123.45", "count": "7", "frozen": "0"}"#).unwrap();
        let from_number: Sample =
            serde_json::from_str(r#"{"value": 123.45, "count": 7, "frozen": 0}"#).unwrap();

        assert_eq!(from_string.value, 123.45);
        assert_eq!(from_string.value.to_bits(), from_number.value.to_bits());
        assert_eq!(from_string.count, from_number.count);
        assert!(!from_string.frozen);
    }

    #[test]
    fn test_small_values_keep_precision() {
        let amount: Amount = serde_json::from_str(r#""0.00000001""#).unwrap();
        assert_eq!(amount.value(), 1e-8);

        let amount: Amount = serde_json::from_str("0.00460208").unwrap();
        assert_eq!(amount.value(), 0.00460208);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Amount>(r#""abc""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""NaN""#).is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
        assert!(serde_json::from_str::<Amount>("{}").is_err());
    }

    #[test]
    fn test_integer_range_checked() {
        let result: Result<Sample, _> =
            serde_json::from_str(r#"{"value": 1, "count": 5000000000, "frozen": 1}"#);
        assert!(result.is_err());

        let result: Result<Sample, _> =
            serde_json::from_str(r#"{"value": 1, "count": -1, "frozen": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_flag_true() {
        let sample: Sample =
            serde_json::from_str(r#"{"value": "1", "count": 1, "frozen": "1"}"#).unwrap();
        assert!(sample.frozen);
    }
}
