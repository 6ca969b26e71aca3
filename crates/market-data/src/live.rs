use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insight_core::{InsightError, Quote};

use crate::provider::{MarketDataConfig, QuoteProvider};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Live quote provider over the chart HTTP endpoint.
///
/// Provider-specific JSON is normalized into `Quote` here; nothing
/// downstream sees the raw response shape.
pub struct LiveQuoteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LiveQuoteProvider {
    pub fn new(config: &MarketDataConfig) -> Result<Self, InsightError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| InsightError::FetchFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn fetch_chart(&self, symbol: &str) -> Result<serde_json::Value> {
        let url = format!(
            "{}/chart/{}?range=3mo&interval=1d",
            self.base_url,
            urlencode(symbol)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("quote endpoint returned {}", response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Minimal percent-encoding for the symbol path segment (^, =)
fn urlencode(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace('=', "%3D")
}

fn parse_chart(symbol: &str, name: &str, json: &serde_json::Value) -> Result<Quote> {
    let result = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| anyhow!("no chart data for {}", symbol))?;

    let meta = result
        .get("meta")
        .ok_or_else(|| anyhow!("no chart meta for {}", symbol))?;

    let price = meta
        .get("regularMarketPrice")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| anyhow!("no market price for {}", symbol))?;

    let previous_close = meta
        .get("chartPreviousClose")
        .or_else(|| meta.get("previousClose"))
        .and_then(|v| v.as_f64())
        .unwrap_or(price);

    let timestamps_raw = result
        .get("timestamp")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let closes_raw = result
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("close"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    // Keep closes and timestamps aligned; the provider nulls out holiday rows
    let mut historical = Vec::with_capacity(closes_raw.len());
    let mut history_timestamps: Vec<DateTime<Utc>> = Vec::with_capacity(closes_raw.len());
    for (ts, close) in timestamps_raw.iter().zip(closes_raw.iter()) {
        if let (Some(ts), Some(close)) = (ts.as_i64(), close.as_f64()) {
            if let Some(dt) = DateTime::from_timestamp(ts, 0) {
                historical.push(close);
                history_timestamps.push(dt);
            }
        }
    }

    let mut quote = Quote::new(
        symbol,
        name,
        price,
        previous_close,
        meta.get("regularMarketDayHigh")
            .and_then(|v| v.as_f64())
            .unwrap_or(price),
        meta.get("regularMarketDayLow")
            .and_then(|v| v.as_f64())
            .unwrap_or(price),
        historical,
        history_timestamps,
    );
    quote.volume = meta.get("regularMarketVolume").and_then(|v| v.as_u64());
    quote.fifty_two_week_high = meta.get("fiftyTwoWeekHigh").and_then(|v| v.as_f64());
    quote.fifty_two_week_low = meta.get("fiftyTwoWeekLow").and_then(|v| v.as_f64());
    if let Some(state) = meta.get("marketState").and_then(|v| v.as_str()) {
        quote.market_state = state.to_string();
    }

    Ok(quote)
}

#[async_trait]
impl QuoteProvider for LiveQuoteProvider {
    async fn fetch_quote(&self, symbol: &str, name: &str) -> Result<Quote, InsightError> {
        let json = self
            .fetch_chart(symbol)
            .await
            .map_err(|e| InsightError::FetchFailed(format!("{}: {}", symbol, e)))?;

        parse_chart(symbol, name, &json).map_err(|e| InsightError::ParseFailed(e.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "live"
    }
}
