pub mod cache;
pub mod live;
pub mod provider;
pub mod substitute;
pub mod watchlist;

pub use cache::SnapshotCache;
pub use live::LiveQuoteProvider;
pub use provider::{MarketDataConfig, QuoteProvider, WatchSymbol};
pub use substitute::StaticQuoteProvider;
pub use watchlist::{default_watchlist, fetch_snapshot};
