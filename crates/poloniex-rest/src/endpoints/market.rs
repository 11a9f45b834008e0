//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use crate::dispatch::{params, CallKind, Dispatcher, Params};
use crate::error::{RestError, RestResult};
use poloniex_types::{
    ChartPeriod, ChartPoint, Currencies, DailyVolume, LoanOrders, OrderBook, OrderBooks, Ticker,
    Tickers, TradeRecord,
};
use tracing::{debug, instrument};

/// Deepest order book Poloniex will return
pub const MAX_BOOK_DEPTH: u32 = 100;

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, command: &str, params: Params) -> RestResult<T> {
        self.dispatcher.call(CallKind::Public, command, params).await
    }

    /// Get tickers for every market
    #[instrument(skip(self))]
    pub async fn get_tickers(&self) -> RestResult<Tickers> {
        debug!("Fetching tickers");
        self.get("returnTicker", Params::new()).await
    }

    /// Get the ticker for one market
    ///
    /// # Arguments
    /// * `pair` - Market pair (e.g., "BTC_ETH")
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> RestResult<Ticker> {
        let mut tickers = self.get_tickers().await?;
        tickers
            .remove(pair)
            .ok_or_else(|| RestError::InvalidParameter(format!("Unknown market: {}", pair)))
    }

    /// Get 24-hour volume for every market plus the aggregate totals
    #[instrument(skip(self))]
    pub async fn get_daily_volume(&self) -> RestResult<DailyVolume> {
        debug!("Fetching 24h volume");
        self.get("return24hVolume", Params::new()).await
    }

    /// Get the order book for one market
    ///
    /// # Arguments
    /// * `pair` - Market pair (e.g., "BTC_ETH")
    /// * `depth` - Levels per side (capped at 100)
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, pair: &str, depth: Option<u32>) -> RestResult<OrderBook> {
        if pair.eq_ignore_ascii_case("all") {
            return Err(RestError::InvalidParameter(
                "use get_order_books for every market".to_string(),
            ));
        }

        debug!("Fetching order book for {}", pair);
        self.get("returnOrderBook", book_params(pair, depth)).await
    }

    /// Get order books for every market
    ///
    /// # Arguments
    /// * `depth` - Levels per side (capped at 100)
    #[instrument(skip(self))]
    pub async fn get_order_books(&self, depth: Option<u32>) -> RestResult<OrderBooks> {
        debug!("Fetching all order books");
        self.get("returnOrderBook", book_params("all", depth)).await
    }

    /// Get public trade history
    ///
    /// # Arguments
    /// * `pair` - Market pair (e.g., "BTC_ETH")
    /// * `start` - Range start, Unix seconds (optional)
    /// * `end` - Range end, Unix seconds (optional)
    #[instrument(skip(self))]
    pub async fn get_trade_history(
        &self,
        pair: &str,
        start: Option<u64>,
        end: Option<u64>,
    ) -> RestResult<Vec<TradeRecord>> {
        if let (Some(start), Some(end)) = (start, end) {
            check_range(start, end)?;
        }

        let mut params = params([("currencyPair", pair)]);
        if let Some(start) = start {
            params.insert("start".to_string(), start.to_string());
        }
        if let Some(end) = end {
            params.insert("end".to_string(), end.to_string());
        }

        debug!("Fetching trade history for {}", pair);
        self.get("returnTradeHistory", params).await
    }

    /// Get candlestick data
    ///
    /// # Arguments
    /// * `pair` - Market pair (e.g., "BTC_ETH")
    /// * `start` - Range start, Unix seconds
    /// * `end` - Range end, Unix seconds
    /// * `period` - Candle width
    #[instrument(skip(self))]
    pub async fn get_chart_data(
        &self,
        pair: &str,
        start: u64,
        end: u64,
        period: ChartPeriod,
    ) -> RestResult<Vec<ChartPoint>> {
        check_range(start, end)?;

        let params = params([
            ("currencyPair", pair.to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
            ("period", period.to_string()),
        ]);

        debug!("Fetching {}s candles for {}", period, pair);
        self.get("returnChartData", params).await
    }

    /// Get every listed currency
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> RestResult<Currencies> {
        debug!("Fetching currencies");
        self.get("returnCurrencies", Params::new()).await
    }

    /// Get open loan offers and demands
    ///
    /// # Arguments
    /// * `currency` - Currency code (e.g., "BTC")
    #[instrument(skip(self))]
    pub async fn get_loan_orders(&self, currency: &str) -> RestResult<LoanOrders> {
        debug!("Fetching loan orders for {}", currency);
        self.get("returnLoanOrders", params([("currency", currency)])).await
    }
}

fn book_params(pair: &str, depth: Option<u32>) -> Params {
    let mut params = params([("currencyPair", pair)]);
    if let Some(depth) = depth {
        params.insert("depth".to_string(), depth.min(MAX_BOOK_DEPTH).to_string());
    }
    params
}

fn check_range(start: u64, end: u64) -> RestResult<()> {
    if start > end {
        return Err(RestError::InvalidParameter(format!(
            "start ({}) is after end ({})",
            start, end
        )));
    }
    Ok(())
}
