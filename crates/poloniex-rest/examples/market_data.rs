//! Market data example: print 24h volume leaders and a book snapshot
//!
//! Run with: cargo run -p poloniex-rest --example market_data

use poloniex_rest::{ChartPeriod, PoloniexClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = PoloniexClient::new()?;

    let volume = client.daily_volume().await?;
    println!("24h totals: BTC {:?}, USDT {:?}", volume.total_btc, volume.total_usdt);

    let mut markets: Vec<_> = volume
        .volumes
        .iter()
        .filter_map(|(pair, per_currency)| Some((pair, *per_currency.get("BTC")?)))
        .collect();
    markets.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("\nTop BTC markets:");
    for (pair, btc) in markets.iter().take(5) {
        println!("  {:<12} {:>14.4} BTC", pair, btc);
    }

    let ticker = client.ticker("BTC_ETH").await?;
    println!(
        "\nBTC_ETH last {:.8} bid {:.8} ask {:.8} ({:+.2}%)",
        ticker.last,
        ticker.highest_bid,
        ticker.lowest_ask,
        ticker.percent_change * 100.0
    );

    let book = client.order_book("BTC_ETH", Some(5)).await?;
    println!("\nOrder book (seq {}):", book.seq);
    for level in book.asks.iter().rev() {
        println!("  ask {:.8} x {:.4}", level.price, level.amount);
    }
    for level in &book.bids {
        println!("  bid {:.8} x {:.4}", level.price, level.amount);
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let candles = client
        .chart_data("BTC_ETH", now - 86_400, now, ChartPeriod::H4)
        .await?;
    println!("\n{} four-hour candles in the last day", candles.len());

    Ok(())
}
