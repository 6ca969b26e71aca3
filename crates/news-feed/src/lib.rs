pub mod client;
pub mod dedup;
pub mod sanitize;
pub mod sources;

pub use client::{FeedClient, NewsFeedConfig};
pub use dedup::{freshness_score, DedupWindow, FreshnessConfig};
pub use sanitize::{fingerprint, Sanitizer};
pub use sources::{default_sources, FeedSource};
