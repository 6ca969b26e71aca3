use insight_core::NewsCategory;

/// A configured feed endpoint with its source-level credibility constant
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
    pub category: NewsCategory,
    /// 0-100, fixed per source
    pub credibility: u8,
}

impl FeedSource {
    pub fn new(url: &str, name: &str, category: NewsCategory, credibility: u8) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            category,
            credibility: credibility.min(100),
        }
    }
}

/// Default source table. Credibility values are policy constants, not
/// derived scores.
pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "https://feeds.example-wire.com/macro.json",
            "Macro Wire",
            NewsCategory::Macro,
            90,
        ),
        FeedSource::new(
            "https://feeds.example-wire.com/equities.json",
            "Equity Desk",
            NewsCategory::Equities,
            85,
        ),
        FeedSource::new(
            "https://feeds.example-wire.com/rates.json",
            "Rates Monitor",
            NewsCategory::Rates,
            80,
        ),
        FeedSource::new(
            "https://feeds.example-crypto.com/top.json",
            "Crypto Ledger",
            NewsCategory::Crypto,
            65,
        ),
        FeedSource::new(
            "https://feeds.example-commodities.com/metals.json",
            "Commodity Brief",
            NewsCategory::Commodities,
            70,
        ),
        FeedSource::new(
            "https://feeds.example-agg.com/general.json",
            "Market Roundup",
            NewsCategory::General,
            55,
        ),
    ]
}
