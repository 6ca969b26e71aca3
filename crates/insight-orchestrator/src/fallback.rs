//! Deterministic artifact synthesis for when no generative backend is
//! available or its output cannot be used. Same draft shapes as the parser
//! produces, so downstream handling never branches on the path taken.

use insight_core::{
    AssetImplication, Direction, DollarStrength, EventCard, ImpactLevel, MarketSnapshot, NewsCategory,
    NewsItem, RiskAppetite, RiskLevel, Scenarios, TrendDirection, VolatilityLevel, YieldEnvironment,
};
use technical_analysis::ReferenceBasket;

use crate::config::OrchestratorConfig;
use crate::parser::{EventCardDraft, InsightDraft};

/// Template an event card from a cluster without generative help.
///
/// Callers guarantee a non-empty cluster; empty clusters never produce cards.
pub fn fallback_event_card(
    category: NewsCategory,
    items: &[NewsItem],
    config: &OrchestratorConfig,
) -> EventCardDraft {
    let title = items
        .first()
        .map(|i| i.title.clone())
        .unwrap_or_else(|| format!("{} developments", category.as_str()));

    let headlines: Vec<&str> = items.iter().take(3).map(|i| i.title.as_str()).collect();
    let summary = format!(
        "{} related {} stories in the current window: {}.",
        items.len(),
        category.as_str(),
        headlines.join("; ")
    );

    let impact = match items.len() {
        0..=1 => ImpactLevel::Low,
        2..=3 => ImpactLevel::Medium,
        _ => ImpactLevel::High,
    };

    EventCardDraft {
        title,
        summary,
        impact,
        affected_assets: category_assets(category),
        confidence: config.fallback_confidence,
        rationale: format!(
            "Templated from {} item(s) grouped by category; no generative analysis applied.",
            items.len()
        ),
    }
}

/// Template a full insight from the snapshot and recent event cards.
/// Theses come from whichever reference basket the caller scores against.
pub fn fallback_insight(
    snapshot: &MarketSnapshot,
    events: &[EventCard],
    basket: &ReferenceBasket,
    config: &OrchestratorConfig,
) -> InsightDraft {
    let summary = &snapshot.summary;

    let members = [
        &basket.equity,
        &basket.volatility,
        &basket.dollar,
        &basket.crypto,
        &basket.metal,
        &basket.rate,
    ];
    let mut theses = Vec::new();
    for symbol in members {
        if let Some(quote) = snapshot.quotes.get(symbol) {
            let trend = quote
                .indicators
                .as_ref()
                .map(|i| i.trend.to_label())
                .unwrap_or("Unknown");
            theses.push(format!(
                "{} at {:.2} ({:+.2}%), trend {}.",
                quote.name, quote.price, quote.change_percent, trend
            ));
        }
    }
    if theses.is_empty() {
        theses.push("No reference quotes available; market read is indeterminate.".to_string());
    }

    let evidence = events
        .iter()
        .take(5)
        .map(|event| insight_core::Evidence {
            claim: event.title.clone(),
            source: event
                .sources
                .first()
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "event card".to_string()),
        })
        .collect();

    let counter_arguments = vec![match summary.risk_appetite {
        RiskAppetite::RiskOn => {
            "Crowded risk-on positioning can unwind quickly on a negative surprise.".to_string()
        }
        RiskAppetite::RiskOff => {
            "Defensive positioning may already price in the bad news, limiting downside.".to_string()
        }
        RiskAppetite::Neutral => {
            "Mixed cross-asset signals leave the direction of the next move unresolved.".to_string()
        }
    }];

    InsightDraft {
        theses,
        evidence,
        counter_arguments,
        scenarios: scenarios_from_summary(summary.equity_trend, summary.volatility_level),
        confidence: config.fallback_confidence,
        risk_level: risk_level_from_summary(summary.volatility_level, summary.risk_appetite),
        horizon: "1-2 weeks".to_string(),
        asset_implications: implications_from_summary(
            summary.equity_trend,
            summary.dollar_strength,
            summary.yield_environment,
            summary.risk_appetite,
        ),
    }
}

fn category_assets(category: NewsCategory) -> Vec<String> {
    let assets: &[&str] = match category {
        NewsCategory::Macro => &["^GSPC", "DX-Y.NYB", "^TNX"],
        NewsCategory::Equities => &["^GSPC", "^DJI", "^IXIC"],
        NewsCategory::Crypto => &["BTC-USD", "ETH-USD"],
        NewsCategory::Commodities => &["GC=F", "CL=F"],
        NewsCategory::Rates => &["^TNX", "DX-Y.NYB"],
        NewsCategory::General => &["^GSPC"],
    };
    assets.iter().map(|s| s.to_string()).collect()
}

fn scenarios_from_summary(trend: TrendDirection, volatility: VolatilityLevel) -> Scenarios {
    let base = format!(
        "The prevailing {} in equities continues with {} volatility.",
        trend.to_label().to_lowercase(),
        match volatility {
            VolatilityLevel::Low => "subdued",
            VolatilityLevel::Moderate => "moderate",
            VolatilityLevel::High => "elevated",
        }
    );
    Scenarios {
        base,
        bull: "Improving breadth and easing volatility extend gains across risk assets.".to_string(),
        bear: "A volatility spike forces de-risking and the recent trend reverses.".to_string(),
    }
}

fn risk_level_from_summary(volatility: VolatilityLevel, appetite: RiskAppetite) -> RiskLevel {
    match (volatility, appetite) {
        (VolatilityLevel::High, RiskAppetite::RiskOff) => RiskLevel::High,
        (VolatilityLevel::High, _) => RiskLevel::Elevated,
        (VolatilityLevel::Moderate, RiskAppetite::RiskOff) => RiskLevel::Elevated,
        (VolatilityLevel::Moderate, _) => RiskLevel::Moderate,
        (VolatilityLevel::Low, _) => RiskLevel::Low,
    }
}

fn implications_from_summary(
    trend: TrendDirection,
    dollar: DollarStrength,
    yields: YieldEnvironment,
    appetite: RiskAppetite,
) -> Vec<AssetImplication> {
    let equity_direction = match trend {
        TrendDirection::StrongUptrend | TrendDirection::Uptrend => Direction::Bullish,
        TrendDirection::Sideways => Direction::Neutral,
        TrendDirection::Downtrend | TrendDirection::StrongDowntrend => Direction::Bearish,
    };
    let dollar_direction = match dollar {
        DollarStrength::Strengthening => Direction::Bullish,
        DollarStrength::Stable => Direction::Neutral,
        DollarStrength::Weakening => Direction::Bearish,
    };
    let bond_direction = match yields {
        // Rising yields mean falling bond prices
        YieldEnvironment::HighYields => Direction::Bearish,
        YieldEnvironment::Normal => Direction::Neutral,
        YieldEnvironment::LowYields => Direction::Bullish,
    };
    let crypto_direction = match appetite {
        RiskAppetite::RiskOn => Direction::Bullish,
        RiskAppetite::Neutral => Direction::Neutral,
        RiskAppetite::RiskOff => Direction::Bearish,
    };

    vec![
        AssetImplication {
            asset_class: "equities".to_string(),
            direction: equity_direction,
            note: format!("Benchmark trend reads {}.", trend.to_label().to_lowercase()),
        },
        AssetImplication {
            asset_class: "dollar".to_string(),
            direction: dollar_direction,
            note: "Direction taken from the dollar index day change.".to_string(),
        },
        AssetImplication {
            asset_class: "bonds".to_string(),
            direction: bond_direction,
            note: "Inverse read of the 10-year yield environment.".to_string(),
        },
        AssetImplication {
            asset_class: "crypto".to_string(),
            direction: crypto_direction,
            note: "Tracks the cross-asset risk appetite signal.".to_string(),
        },
    ]
}
