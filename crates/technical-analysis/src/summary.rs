use insight_core::{
    DollarStrength, MarketSummary, Quote, RiskAppetite, TrendDirection, VolatilityLevel,
    YieldEnvironment,
};
use std::collections::HashMap;

/// Fixed basket of reference instruments the summary is scored against.
///
/// One equity index, one volatility index, one dollar index, one crypto
/// asset, one precious metal, one long-tenor rate.
#[derive(Debug, Clone)]
pub struct ReferenceBasket {
    pub equity: String,
    pub volatility: String,
    pub dollar: String,
    pub crypto: String,
    pub metal: String,
    pub rate: String,
}

impl Default for ReferenceBasket {
    fn default() -> Self {
        Self {
            equity: "^GSPC".to_string(),
            volatility: "^VIX".to_string(),
            dollar: "DX-Y.NYB".to_string(),
            crypto: "BTC-USD".to_string(),
            metal: "GC=F".to_string(),
            rate: "^TNX".to_string(),
        }
    }
}

const VIX_HIGH: f64 = 25.0;
const VIX_MODERATE: f64 = 18.0;
const DOLLAR_MOVE_PCT: f64 = 0.5;
const YIELD_HIGH: f64 = 4.5;
const YIELD_NORMAL: f64 = 3.5;
const EQUITY_MOVE_PCT: f64 = 0.5;
const CRYPTO_MOVE_PCT: f64 = 2.0;
const METAL_MOVE_PCT: f64 = 1.0;
const RISK_SCORE_THRESHOLD: i32 = 2;

/// Score qualitative market labels from the current snapshot's basket quotes.
///
/// A missing basket member contributes no signal to any of its checks;
/// it is never an error.
pub fn score_summary(quotes: &HashMap<String, Quote>, basket: &ReferenceBasket) -> MarketSummary {
    let equity = quotes.get(&basket.equity);
    let vix = quotes.get(&basket.volatility);
    let dollar = quotes.get(&basket.dollar);
    let crypto = quotes.get(&basket.crypto);
    let metal = quotes.get(&basket.metal);
    let rate = quotes.get(&basket.rate);

    let equity_trend = equity
        .and_then(|q| q.indicators.as_ref())
        .map(|ind| ind.trend)
        .unwrap_or(TrendDirection::Sideways);

    let volatility_level = match vix.map(|q| q.price) {
        Some(p) if p > VIX_HIGH => VolatilityLevel::High,
        Some(p) if p > VIX_MODERATE => VolatilityLevel::Moderate,
        Some(_) => VolatilityLevel::Low,
        None => VolatilityLevel::Low,
    };

    let dollar_strength = match dollar.map(|q| q.change_percent) {
        Some(c) if c > DOLLAR_MOVE_PCT => DollarStrength::Strengthening,
        Some(c) if c < -DOLLAR_MOVE_PCT => DollarStrength::Weakening,
        _ => DollarStrength::Stable,
    };

    let yield_environment = match rate.map(|q| q.price) {
        Some(p) if p > YIELD_HIGH => YieldEnvironment::HighYields,
        Some(p) if p > YIELD_NORMAL => YieldEnvironment::Normal,
        Some(_) => YieldEnvironment::LowYields,
        None => YieldEnvironment::Normal,
    };

    let risk_appetite = score_risk_appetite(equity, vix, crypto, metal);

    MarketSummary {
        equity_trend,
        volatility_level,
        dollar_strength,
        risk_appetite,
        yield_environment,
    }
}

/// Signed accumulator over six independent checks.
///
/// A precious-metal rally counts against risk appetite — gold bids are
/// a risk-off signal, hence the inverted sign on the metal check.
fn score_risk_appetite(
    equity: Option<&Quote>,
    vix: Option<&Quote>,
    crypto: Option<&Quote>,
    metal: Option<&Quote>,
) -> RiskAppetite {
    let mut score: i32 = 0;

    if let Some(q) = equity {
        if q.change_percent > EQUITY_MOVE_PCT {
            score += 1;
        } else if q.change_percent < -EQUITY_MOVE_PCT {
            score -= 1;
        }
    }

    if let Some(q) = vix {
        if q.price < VIX_MODERATE {
            score += 1;
        } else if q.price > VIX_HIGH {
            score -= 1;
        }
    }

    if let Some(q) = crypto {
        if q.change_percent > CRYPTO_MOVE_PCT {
            score += 1;
        } else if q.change_percent < -CRYPTO_MOVE_PCT {
            score -= 1;
        }
    }

    if let Some(q) = metal {
        if q.change_percent > METAL_MOVE_PCT {
            score -= 1;
        } else if q.change_percent < -METAL_MOVE_PCT {
            score += 1;
        }
    }

    if score >= RISK_SCORE_THRESHOLD {
        RiskAppetite::RiskOn
    } else if score <= -RISK_SCORE_THRESHOLD {
        RiskAppetite::RiskOff
    } else {
        RiskAppetite::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators;

    fn quote(symbol: &str, price: f64, previous_close: f64) -> Quote {
        Quote::new(symbol, symbol, price, previous_close, price, price, vec![], vec![])
    }

    fn basket_quotes(pairs: &[(&str, f64, f64)]) -> HashMap<String, Quote> {
        pairs
            .iter()
            .map(|(s, p, pc)| (s.to_string(), quote(s, *p, *pc)))
            .collect()
    }

    #[test]
    fn volatility_level_thresholds() {
        let basket = ReferenceBasket::default();
        for (price, expected) in [
            (14.0, VolatilityLevel::Low),
            (20.0, VolatilityLevel::Moderate),
            (30.0, VolatilityLevel::High),
        ] {
            let quotes = basket_quotes(&[("^VIX", price, price)]);
            let summary = score_summary(&quotes, &basket);
            assert_eq!(summary.volatility_level, expected, "VIX {}", price);
        }
    }

    #[test]
    fn dollar_strength_from_change_percent() {
        let basket = ReferenceBasket::default();

        let quotes = basket_quotes(&[("DX-Y.NYB", 105.0, 104.0)]); // ~+0.96%
        assert_eq!(
            score_summary(&quotes, &basket).dollar_strength,
            DollarStrength::Strengthening
        );

        let quotes = basket_quotes(&[("DX-Y.NYB", 104.0, 105.0)]);
        assert_eq!(
            score_summary(&quotes, &basket).dollar_strength,
            DollarStrength::Weakening
        );

        let quotes = basket_quotes(&[("DX-Y.NYB", 104.1, 104.0)]);
        assert_eq!(
            score_summary(&quotes, &basket).dollar_strength,
            DollarStrength::Stable
        );
    }

    #[test]
    fn yield_environment_thresholds() {
        let basket = ReferenceBasket::default();
        for (price, expected) in [
            (4.8, YieldEnvironment::HighYields),
            (4.0, YieldEnvironment::Normal),
            (2.5, YieldEnvironment::LowYields),
        ] {
            let quotes = basket_quotes(&[("^TNX", price, price)]);
            assert_eq!(score_summary(&quotes, &basket).yield_environment, expected);
        }
    }

    #[test]
    fn risk_on_when_equity_and_crypto_rally_with_calm_vix() {
        let basket = ReferenceBasket::default();
        let quotes = basket_quotes(&[
            ("^GSPC", 5050.0, 5000.0), // +1.0%
            ("^VIX", 14.0, 14.0),      // calm
            ("BTC-USD", 70000.0, 67000.0), // +4.5%
        ]);
        assert_eq!(score_summary(&quotes, &basket).risk_appetite, RiskAppetite::RiskOn);
    }

    #[test]
    fn risk_off_includes_inverted_metal_signal() {
        let basket = ReferenceBasket::default();
        let quotes = basket_quotes(&[
            ("^GSPC", 4940.0, 5000.0), // -1.2%
            ("GC=F", 2080.0, 2040.0),  // gold rally ~+2% -> risk-off
        ]);
        assert_eq!(score_summary(&quotes, &basket).risk_appetite, RiskAppetite::RiskOff);
    }

    #[test]
    fn missing_basket_members_are_no_signal() {
        let basket = ReferenceBasket::default();
        let summary = score_summary(&HashMap::new(), &basket);
        assert_eq!(summary.risk_appetite, RiskAppetite::Neutral);
        assert_eq!(summary.equity_trend, TrendDirection::Sideways);
    }

    #[test]
    fn upward_equity_series_with_calm_vix_scores_low_vol_uptrend() {
        let basket = ReferenceBasket::default();

        // Net upward, low realized volatility
        let mut closes = Vec::new();
        let mut price = 100.0;
        for i in 0..30 {
            price += if i % 4 == 0 { -0.4 } else { 1.1 };
            closes.push(price);
        }

        let mut equity = quote("^GSPC", price, price - 5.0);
        equity.indicators = indicators::compute(&closes);
        let mut quotes = HashMap::new();
        quotes.insert("^GSPC".to_string(), equity);
        quotes.insert("^VIX".to_string(), quote("^VIX", 14.0, 14.0));

        let summary = score_summary(&quotes, &basket);
        assert_eq!(summary.volatility_level, VolatilityLevel::Low);
        assert!(matches!(
            summary.equity_trend,
            TrendDirection::Uptrend | TrendDirection::StrongUptrend
        ));
    }
}
