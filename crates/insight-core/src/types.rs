use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Five-level trend classification derived from the indicator score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StrongDowntrend,
    Downtrend,
    Sideways,
    Uptrend,
    StrongUptrend,
}

impl TrendDirection {
    /// Human-readable label for the trend
    pub fn to_label(&self) -> &'static str {
        match self {
            TrendDirection::StrongDowntrend => "Strong Downtrend",
            TrendDirection::Downtrend => "Downtrend",
            TrendDirection::Sideways => "Sideways",
            TrendDirection::Uptrend => "Uptrend",
            TrendDirection::StrongUptrend => "Strong Uptrend",
        }
    }
}

/// Indicator set computed fresh for each quote snapshot.
///
/// Owned by its `Quote` and replaced wholesale on refetch, never mutated
/// in place. `None` moving averages mean insufficient history, not zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    /// 14-period RSI, bounded [0, 100]; neutral 50 when history is too short
    pub rsi: f64,
    /// 10-period momentum as a percentage
    pub momentum: f64,
    /// Annualized volatility of daily returns, as a percentage
    pub volatility: f64,
    pub trend: TrendDirection,
}

/// Normalized quote record for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: Option<u64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    /// Historical closes, oldest first; same length as `history_timestamps`
    pub historical: Vec<f64>,
    pub history_timestamps: Vec<DateTime<Utc>>,
    pub market_state: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub indicators: Option<TechnicalIndicators>,
}

impl Quote {
    /// Build a quote enforcing `change = price - previous_close`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        previous_close: f64,
        day_high: f64,
        day_low: f64,
        historical: Vec<f64>,
        history_timestamps: Vec<DateTime<Utc>>,
    ) -> Self {
        let change = price - previous_close;
        let change_percent = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            previous_close,
            change,
            change_percent,
            day_high,
            day_low,
            volume: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            historical,
            history_timestamps,
            market_state: "REGULAR".to_string(),
            fetched_at: Utc::now(),
            indicators: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DollarStrength {
    Weakening,
    Stable,
    Strengthening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAppetite {
    RiskOff,
    Neutral,
    RiskOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldEnvironment {
    LowYields,
    Normal,
    HighYields,
}

/// Qualitative labels derived from the current snapshot's reference basket.
///
/// No historical memory: computed solely from the quotes of one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub equity_trend: TrendDirection,
    pub volatility_level: VolatilityLevel,
    pub dollar_strength: DollarStrength,
    pub risk_appetite: RiskAppetite,
    pub yield_environment: YieldEnvironment,
}

impl Default for MarketSummary {
    fn default() -> Self {
        Self {
            equity_trend: TrendDirection::Sideways,
            volatility_level: VolatilityLevel::Low,
            dollar_strength: DollarStrength::Stable,
            risk_appetite: RiskAppetite::Neutral,
            yield_environment: YieldEnvironment::Normal,
        }
    }
}

/// Immutable point-in-time view of the tracked market.
///
/// Superseded wholesale by the next fetch cycle, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    pub quotes: HashMap<String, Quote>,
    pub summary: MarketSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Macro,
    Equities,
    Crypto,
    Commodities,
    Rates,
    General,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Macro => "macro",
            NewsCategory::Equities => "equities",
            NewsCategory::Crypto => "crypto",
            NewsCategory::Commodities => "commodities",
            NewsCategory::Rates => "rates",
            NewsCategory::General => "general",
        }
    }
}

/// Sanitized, fingerprinted news item.
///
/// Immutable after creation. Dedup identity is `fingerprint`, not the URL —
/// titles and URLs may vary in encoding across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    /// Sanitized body excerpt, capped length
    pub excerpt: String,
    pub source: String,
    pub source_url: String,
    pub category: NewsCategory,
    /// Source-level credibility constant, 0-100
    pub credibility: u8,
    /// Short content hash of title + URL
    pub fingerprint: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

/// Origin metadata attached to every generated artifact.
///
/// Required for auditability; `generator` is the model id or `"fallback"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub generator: String,
    pub template_version: String,
    pub generated_at: DateTime<Utc>,
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        self.generator == "fallback"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub url: String,
    pub credibility: u8,
}

/// Narrative card derived from a category cluster of news items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: NewsCategory,
    pub impact: ImpactLevel,
    pub affected_assets: Vec<String>,
    /// Adjusted confidence, clamped to [10, 90]
    pub confidence: u8,
    pub rationale: String,
    pub sources: Vec<SourceRef>,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub claim: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenarios {
    pub base: String,
    pub bull: String,
    pub bear: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bearish,
    Neutral,
    Bullish,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetImplication {
    pub asset_class: String,
    pub direction: Direction,
    pub note: String,
}

/// Structured market read derived from a snapshot plus recent event cards.
///
/// Immutable after creation; superseded by later insights, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub theses: Vec<String>,
    pub evidence: Vec<Evidence>,
    pub counter_arguments: Vec<String>,
    pub scenarios: Scenarios,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub horizon: String,
    pub asset_implications: Vec<AssetImplication>,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
}

/// Derived signal flagging a high-impact event cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub headline: String,
    pub severity: ImpactLevel,
    pub category: NewsCategory,
    pub event_id: String,
    pub triggered_at: DateTime<Utc>,
}
