use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use insight_core::NewsItem;
use std::time::Duration;
use tracing::{debug, warn};

use crate::sanitize::{fingerprint, Sanitizer};
use crate::sources::FeedSource;

const USER_AGENT: &str = "insight-engine/0.1 (+news-feed)";

/// Configuration for feed fetching
#[derive(Debug, Clone)]
pub struct NewsFeedConfig {
    pub request_timeout: Duration,
    /// Sources fetched concurrently per batch
    pub batch_size: usize,
    pub batch_pause: Duration,
}

impl Default for NewsFeedConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            batch_size: 4,
            batch_pause: Duration::from_millis(250),
        }
    }
}

/// Fetches configured feeds and normalizes them into `NewsItem`s.
///
/// Per-source failures degrade to an empty set for that source; the
/// merged fetch never aborts.
pub struct FeedClient {
    client: reqwest::Client,
    sanitizer: Sanitizer,
    config: NewsFeedConfig,
}

impl FeedClient {
    pub fn new(config: NewsFeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            sanitizer: Sanitizer::new(),
            config,
        })
    }

    /// Fetch all sources in bounded batches; merged result is sorted
    /// newest-published-first.
    pub async fn fetch_all(&self, sources: &[FeedSource]) -> Vec<NewsItem> {
        let mut items: Vec<NewsItem> = Vec::new();
        let batch_size = self.config.batch_size.max(1);

        for (batch_index, batch) in sources.chunks(batch_size).enumerate() {
            if batch_index > 0 {
                tokio::time::sleep(self.config.batch_pause).await;
            }

            let fetches = batch.iter().map(|source| self.fetch_source(source));
            for (source, result) in batch.iter().zip(join_all(fetches).await) {
                match result {
                    Ok(mut source_items) => {
                        debug!(source = %source.name, count = source_items.len(), "feed fetched");
                        items.append(&mut source_items);
                    }
                    Err(e) => {
                        warn!(source = %source.name, error = %e, "feed fetch failed, returning empty set");
                    }
                }
            }
        }

        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        items
    }

    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        let response = self.client.get(&source.url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("feed endpoint returned {}", response.status()));
        }
        let json: serde_json::Value = response.json().await?;
        Ok(self.parse_feed(source, &json, Utc::now()))
    }

    /// Normalize one provider-specific feed payload.
    ///
    /// Accepts either a top-level array or an object with an `items` array;
    /// item fields vary per provider (`url`/`link`, `summary`/`description`).
    /// Unparseable items are skipped.
    pub fn parse_feed(
        &self,
        source: &FeedSource,
        json: &serde_json::Value,
        fetched_at: DateTime<Utc>,
    ) -> Vec<NewsItem> {
        let entries = json
            .as_array()
            .or_else(|| json.get("items").and_then(|v| v.as_array()))
            .cloned()
            .unwrap_or_default();

        entries
            .iter()
            .filter_map(|entry| self.parse_item(source, entry, fetched_at))
            .collect()
    }

    fn parse_item(
        &self,
        source: &FeedSource,
        entry: &serde_json::Value,
        fetched_at: DateTime<Utc>,
    ) -> Option<NewsItem> {
        let raw_title = entry.get("title").and_then(|v| v.as_str())?;
        let url = entry
            .get("url")
            .or_else(|| entry.get("link"))
            .and_then(|v| v.as_str())?
            .trim()
            .to_string();

        let title = self.sanitizer.clean(raw_title);
        if title.is_empty() || url.is_empty() {
            return None;
        }

        let raw_excerpt = entry
            .get("summary")
            .or_else(|| entry.get("description"))
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let published_at = entry
            .get("published_at")
            .or_else(|| entry.get("pubDate"))
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp)
            .unwrap_or(fetched_at);

        Some(NewsItem {
            fingerprint: fingerprint(&title, &url),
            title,
            url,
            published_at,
            excerpt: self.sanitizer.clean(raw_excerpt),
            source: source.name.clone(),
            source_url: source.url.clone(),
            category: source.category,
            credibility: source.credibility,
            fetched_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::NewsCategory;
    use serde_json::json;

    fn source() -> FeedSource {
        FeedSource::new(
            "https://feeds.example-wire.com/macro.json",
            "Macro Wire",
            NewsCategory::Macro,
            90,
        )
    }

    fn client() -> FeedClient {
        FeedClient::new(NewsFeedConfig::default()).unwrap()
    }

    #[test]
    fn parses_items_array_shape() {
        let payload = json!({
            "items": [
                {
                    "title": "Fed Holds Rates Steady",
                    "url": "https://example.com/fed",
                    "published_at": "2026-08-28T12:00:00Z",
                    "summary": "<p>The Fed held rates.</p>"
                }
            ]
        });

        let items = client().parse_feed(&source(), &payload, Utc::now());
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Fed Holds Rates Steady");
        assert_eq!(item.excerpt, "The Fed held rates.");
        assert_eq!(item.credibility, 90);
        assert_eq!(item.fingerprint.len(), 16);
    }

    #[test]
    fn parses_top_level_array_with_alternate_fields() {
        let payload = json!([
            {
                "title": "Gold climbs",
                "link": "https://example.com/gold",
                "pubDate": "Fri, 28 Aug 2026 09:30:00 +0000",
                "description": "Bullion bid."
            }
        ]);

        let items = client().parse_feed(&source(), &payload, Utc::now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://example.com/gold");
        assert_eq!(items[0].excerpt, "Bullion bid.");
    }

    #[test]
    fn skips_items_without_title_or_url() {
        let payload = json!({
            "items": [
                {"title": "No URL here"},
                {"url": "https://example.com/no-title"},
                {"title": "Complete", "url": "https://example.com/ok"}
            ]
        });

        let items = client().parse_feed(&source(), &payload, Utc::now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Complete");
    }

    #[test]
    fn missing_published_defaults_to_fetch_time() {
        let fetched = Utc::now();
        let payload = json!({"items": [{"title": "T", "url": "https://e.com/t"}]});
        let items = client().parse_feed(&source(), &payload, fetched);
        assert_eq!(items[0].published_at, fetched);
    }

    #[test]
    fn identical_title_and_url_produce_identical_fingerprints() {
        let payload = json!({"items": [
            {"title": "Fed Holds Rates Steady", "url": "https://example.com/fed"}
        ]});

        let early = client().parse_feed(&source(), &payload, Utc::now());
        let late = client().parse_feed(&source(), &payload, Utc::now());
        assert_eq!(early[0].fingerprint, late[0].fingerprint);
    }
}
