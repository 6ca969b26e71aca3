use insight_core::{TechnicalIndicators, TrendDirection};

/// Trading days per year, used to annualize daily volatility
const TRADING_DAYS: f64 = 252.0;

/// Neutral RSI returned when the series is too short to compute one.
///
/// Deliberate placeholder rather than a computed value; downstream
/// consumers rely on this exact constant.
pub const RSI_NEUTRAL: f64 = 50.0;

pub const RSI_PERIOD: usize = 14;
pub const MOMENTUM_PERIOD: usize = 10;
pub const SMA_SHORT_WINDOW: usize = 20;
pub const SMA_LONG_WINDOW: usize = 50;
const VOLATILITY_WINDOW: usize = 20;

/// Simple Moving Average of the last `window` closes.
///
/// `None` when there is not enough data — callers must never coerce
/// a missing average to zero.
pub fn sma(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let sum: f64 = closes[closes.len() - window..].iter().sum();
    Some(sum / window as f64)
}

/// Relative Strength Index over the trailing `period` day-over-day changes.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// Returns the neutral constant 50 when the series is shorter than
/// `period + 1`, and exactly 100 when there are zero losses in the window.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    let start = closes.len() - period - 1;
    for i in start + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Momentum over `period` closes, as a percentage.
///
/// Returns 0 when the series is too short.
pub fn momentum(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period {
        return 0.0;
    }
    let base = closes[closes.len() - period];
    if base == 0.0 {
        return 0.0;
    }
    let last = closes[closes.len() - 1];
    (last - base) / base * 100.0
}

/// Annualized volatility of the trailing 20 daily simple returns,
/// as a percentage. Returns 0 when the series is shorter than 20.
pub fn annualized_volatility(closes: &[f64]) -> f64 {
    if closes.len() < VOLATILITY_WINDOW {
        return 0.0;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.is_empty() {
        return 0.0;
    }

    let tail = if returns.len() > VOLATILITY_WINDOW {
        &returns[returns.len() - VOLATILITY_WINDOW..]
    } else {
        &returns[..]
    };

    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    variance.sqrt() * TRADING_DAYS.sqrt() * 100.0
}

/// Composite trend classification from a deterministic point score.
///
/// Needs at least 20 closes; SMA50 falls back to the SMA20 value when the
/// series is shorter than 50. Pure and stateless.
pub fn trend_strength(closes: &[f64]) -> TrendDirection {
    if closes.len() < SMA_SHORT_WINDOW {
        return TrendDirection::Sideways;
    }

    // sma20 is always present here; len >= 20 was checked above
    let sma20 = match sma(closes, SMA_SHORT_WINDOW) {
        Some(v) => v,
        None => return TrendDirection::Sideways,
    };
    let sma50 = sma(closes, SMA_LONG_WINDOW).unwrap_or(sma20);
    let price = closes[closes.len() - 1];
    let rsi_value = rsi(closes, RSI_PERIOD);

    let mut score: i32 = 0;
    score += if price > sma20 { 1 } else { -1 };
    score += if price > sma50 { 1 } else { -1 };
    score += if sma20 > sma50 { 1 } else { -1 };
    if (RSI_NEUTRAL..70.0).contains(&rsi_value) {
        score += 1;
    }
    if rsi_value >= 70.0 {
        score -= 1;
    }
    if rsi_value <= 30.0 {
        score -= 1;
    }

    match score {
        s if s >= 3 => TrendDirection::StrongUptrend,
        s if s >= 1 => TrendDirection::Uptrend,
        s if s >= -1 => TrendDirection::Sideways,
        s if s >= -3 => TrendDirection::Downtrend,
        _ => TrendDirection::StrongDowntrend,
    }
}

/// Compute the full indicator set for one price series.
///
/// `None` only for an empty series; otherwise every field carries its
/// defined insufficient-data sentinel where history is too short.
pub fn compute(closes: &[f64]) -> Option<TechnicalIndicators> {
    if closes.is_empty() {
        return None;
    }

    Some(TechnicalIndicators {
        sma_short: sma(closes, SMA_SHORT_WINDOW),
        sma_long: sma(closes, SMA_LONG_WINDOW),
        rsi: rsi(closes, RSI_PERIOD),
        momentum: momentum(closes, MOMENTUM_PERIOD),
        volatility: annualized_volatility(closes),
        trend: trend_strength(closes),
    })
}
