use async_trait::async_trait;
use insight_core::{InsightError, Quote};
use std::time::Duration;

/// A symbol tracked by the snapshot fetcher, with its display name
#[derive(Debug, Clone)]
pub struct WatchSymbol {
    pub symbol: String,
    pub name: String,
}

impl WatchSymbol {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Configuration for quote fetching
#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Symbols fetched concurrently per batch
    pub batch_size: usize,
    /// Pause between batches, to respect provider rate limits
    pub batch_pause: Duration,
    /// Snapshot cache TTL
    pub cache_ttl: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("QUOTE_API_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com/v8/finance".to_string()),
            request_timeout: Duration::from_secs(10),
            batch_size: 3,
            batch_pause: Duration::from_millis(500),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Capability-typed quote source.
///
/// Two implementations: the live HTTP provider and a deterministic static
/// substitute. Both produce the same `Quote` shape, so downstream consumers
/// never branch on which one is active.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, symbol: &str, name: &str) -> Result<Quote, InsightError>;

    fn provider_name(&self) -> &'static str;
}
