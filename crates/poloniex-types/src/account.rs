//! Private account types

use crate::numeric::Amount;
use serde::Deserialize;
use std::collections::HashMap;

/// `returnBalances` result: currency code → available balance
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Balances(pub HashMap<String, Amount>);

impl Balances {
    /// Available balance for a currency
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).map(|a| a.value())
    }

    /// All balances that are not exactly zero
    pub fn non_zero(&self) -> HashMap<String, f64> {
        self.iter()
            .filter(|(_, balance)| *balance != 0.0)
            .map(|(currency, balance)| (currency.clone(), balance))
            .collect()
    }

    /// Iterate over all balances
    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> {
        self.0.iter().map(|(k, v)| (k, v.value()))
    }

    /// Number of currencies reported
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no currencies were reported
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balances_parsing() {
        let json = r#"{"BTC": "0.59098578", "LTC": "3.31117268", "XMR": "0.00000000"}"#;
        let balances: Balances = serde_json::from_str(json).unwrap();

        assert_eq!(balances.len(), 3);
        assert_eq!(balances.get("BTC"), Some(0.59098578));
        assert_eq!(balances.get("DOGE"), None);

        let non_zero = balances.non_zero();
        assert_eq!(non_zero.len(), 2);
        assert!(!non_zero.contains_key("XMR"));
    }

    #[test]
    fn test_balances_reject_garbage() {
        assert!(serde_json::from_str::<Balances>(r#"{"BTC": "lots"}"#).is_err());
    }
}
