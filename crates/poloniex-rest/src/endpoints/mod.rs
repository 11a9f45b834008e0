//! API endpoint implementations

pub mod account;
pub mod market;

pub use account::AccountEndpoints;
pub use market::MarketEndpoints;
