use chrono::Utc;
use futures_util::future::join_all;
use insight_core::{MarketSnapshot, Quote};
use std::collections::HashMap;
use technical_analysis::{score_summary, ReferenceBasket};
use tracing::{debug, warn};

use crate::provider::{MarketDataConfig, QuoteProvider, WatchSymbol};

/// Fixed symbol set covering the reference basket plus context symbols
pub fn default_watchlist() -> Vec<WatchSymbol> {
    vec![
        WatchSymbol::new("^GSPC", "S&P 500"),
        WatchSymbol::new("^DJI", "Dow Jones Industrial Average"),
        WatchSymbol::new("^IXIC", "NASDAQ Composite"),
        WatchSymbol::new("^VIX", "CBOE Volatility Index"),
        WatchSymbol::new("DX-Y.NYB", "US Dollar Index"),
        WatchSymbol::new("^TNX", "10-Year Treasury Yield"),
        WatchSymbol::new("BTC-USD", "Bitcoin"),
        WatchSymbol::new("ETH-USD", "Ethereum"),
        WatchSymbol::new("GC=F", "Gold Futures"),
        WatchSymbol::new("CL=F", "Crude Oil Futures"),
    ]
}

/// Fetch the watchlist in bounded batches and assemble a snapshot.
///
/// Per-symbol failures are logged and omitted — a partial snapshot is a
/// valid result, and whole-operation failure would be wrong. Batch ordering
/// does not matter: results are merged by symbol afterwards.
pub async fn fetch_snapshot(
    provider: &dyn QuoteProvider,
    watchlist: &[WatchSymbol],
    basket: &ReferenceBasket,
    config: &MarketDataConfig,
) -> MarketSnapshot {
    let mut quotes: HashMap<String, Quote> = HashMap::new();
    let batch_size = config.batch_size.max(1);

    for (batch_index, batch) in watchlist.chunks(batch_size).enumerate() {
        if batch_index > 0 {
            tokio::time::sleep(config.batch_pause).await;
        }

        let fetches = batch
            .iter()
            .map(|w| provider.fetch_quote(&w.symbol, &w.name));

        for (watch, result) in batch.iter().zip(join_all(fetches).await) {
            match result {
                Ok(mut quote) => {
                    quote.indicators = technical_analysis::compute(&quote.historical);
                    quotes.insert(watch.symbol.clone(), quote);
                }
                Err(e) => {
                    warn!(symbol = %watch.symbol, error = %e, "quote fetch failed, omitting symbol");
                }
            }
        }
    }

    debug!(
        provider = provider.provider_name(),
        fetched = quotes.len(),
        requested = watchlist.len(),
        "watchlist fetch complete"
    );

    let summary = score_summary(&quotes, basket);
    MarketSnapshot {
        timestamp: Utc::now(),
        quotes,
        summary,
    }
}
