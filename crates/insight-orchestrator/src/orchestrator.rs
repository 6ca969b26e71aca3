use chrono::Utc;
use insight_core::{
    Alert, ArtifactRepository, EventCard, Insight, InsightError, MarketSnapshot, MemoryRepository,
    NewsItem, Provenance,
};
use llm_client::GenerativeBackend;
use market_data::{
    default_watchlist, fetch_snapshot, MarketDataConfig, QuoteProvider, SnapshotCache, WatchSymbol,
};
use news_feed::{
    default_sources, fingerprint, freshness_score, DedupWindow, FeedClient, FeedSource,
    FreshnessConfig, NewsFeedConfig,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use technical_analysis::ReferenceBasket;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::alerts::detect_alerts;
use crate::config::OrchestratorConfig;
use crate::confidence::{adjust_confidence, mean_credibility};
use crate::events::build_event_cards;
use crate::fallback::fallback_insight;
use crate::parser::{parse_insight, InsightDraft};
use crate::prompts::{self, TEMPLATE_VERSION};

/// Counters for one completed cycle
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    pub snapshot_symbols: usize,
    pub snapshot_was_cached: bool,
    pub news_fetched: usize,
    pub news_admitted: usize,
    pub cards_built: usize,
    pub alerts_raised: usize,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(CycleStats),
    /// A previous cycle was still running; nothing was done
    SkippedOverlap,
    /// The cycle hit an unrecoverable error; partial work may have landed
    Aborted(String),
}

/// Drives the whole pipeline: snapshot, news ingestion, event cards,
/// alerts, and the cycle insight.
///
/// Backend failures never surface past this type; every artifact path has a
/// deterministic fallback, so a cycle with a dead backend still completes.
pub struct Orchestrator {
    quote_provider: Arc<dyn QuoteProvider>,
    backend: Option<Arc<dyn GenerativeBackend>>,
    feed_client: FeedClient,
    sources: Vec<FeedSource>,
    watchlist: Vec<WatchSymbol>,
    basket: ReferenceBasket,
    market_config: MarketDataConfig,
    freshness: FreshnessConfig,
    config: OrchestratorConfig,
    cache: SnapshotCache,
    dedup: Mutex<DedupWindow>,
    news: RwLock<VecDeque<NewsItem>>,
    events: MemoryRepository<EventCard>,
    insights: MemoryRepository<Insight>,
    alerts: MemoryRepository<Alert>,
    cycle_running: AtomicBool,
}

impl Orchestrator {
    pub fn new(
        quote_provider: Arc<dyn QuoteProvider>,
        backend: Option<Arc<dyn GenerativeBackend>>,
        config: OrchestratorConfig,
    ) -> Result<Self, InsightError> {
        let market_config = MarketDataConfig::default();
        let feed_client = FeedClient::new(NewsFeedConfig::default())
            .map_err(|e| InsightError::FetchFailed(e.to_string()))?;

        Ok(Self {
            quote_provider,
            backend,
            feed_client,
            sources: default_sources(),
            watchlist: default_watchlist(),
            basket: ReferenceBasket::default(),
            cache: SnapshotCache::new(market_config.cache_ttl),
            market_config,
            freshness: FreshnessConfig::default(),
            dedup: Mutex::new(DedupWindow::new(config.dedup_retention)),
            news: RwLock::new(VecDeque::new()),
            events: MemoryRepository::new(config.artifact_retention),
            insights: MemoryRepository::new(config.artifact_retention),
            alerts: MemoryRepository::new(config.artifact_retention),
            config,
            cycle_running: AtomicBool::new(false),
        })
    }

    pub fn with_sources(mut self, sources: Vec<FeedSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_watchlist(mut self, watchlist: Vec<WatchSymbol>) -> Self {
        self.watchlist = watchlist;
        self
    }

    pub fn with_market_config(mut self, market_config: MarketDataConfig) -> Self {
        self.cache = SnapshotCache::new(market_config.cache_ttl);
        self.market_config = market_config;
        self
    }

    /// Override the reference basket used for summary scoring and fallback
    /// theses. Watchlist symbols should cover the basket members.
    pub fn with_basket(mut self, basket: ReferenceBasket) -> Self {
        self.basket = basket;
        self
    }

    pub fn with_freshness_config(mut self, freshness: FreshnessConfig) -> Self {
        self.freshness = freshness;
        self
    }

    /// Run one full pipeline cycle. Overlapping calls are no-ops, and any
    /// error is caught here rather than propagated to the scheduler.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .cycle_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("previous cycle still running, skipping this one");
            return CycleOutcome::SkippedOverlap;
        }

        let outcome = match self.run_cycle_inner().await {
            Ok(stats) => {
                info!(
                    symbols = stats.snapshot_symbols,
                    news = stats.news_admitted,
                    cards = stats.cards_built,
                    alerts = stats.alerts_raised,
                    "cycle complete"
                );
                CycleOutcome::Completed(stats)
            }
            Err(e) => {
                error!(error = %e, "cycle aborted");
                CycleOutcome::Aborted(e.to_string())
            }
        };

        self.cycle_running.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_cycle_inner(&self) -> Result<CycleStats, InsightError> {
        let mut stats = CycleStats::default();

        let snapshot = match self.cache.get().await {
            Some(snapshot) => {
                stats.snapshot_was_cached = true;
                snapshot
            }
            None => self.refresh_snapshot().await,
        };
        stats.snapshot_symbols = snapshot.quotes.len();

        let fetched = self.feed_client.fetch_all(&self.sources).await;
        stats.news_fetched = fetched.len();
        stats.news_admitted = self.ingest_news(fetched).await;

        let window = self.event_window().await;
        let cards = build_event_cards(self.backend.as_deref(), &window, &self.config).await;
        stats.cards_built = cards.len();

        let alerts = detect_alerts(&cards, &self.config);
        stats.alerts_raised = alerts.len();

        for card in cards {
            self.events.append(card).await?;
        }
        for alert in alerts {
            self.alerts.append(alert).await?;
        }

        let recent_cards = self.events.list(Some(self.config.insight_event_window)).await;
        let insight = self.generate_insight(&snapshot, &recent_cards).await;
        self.insights.append(insight).await?;

        Ok(stats)
    }

    /// Latest snapshot, fetched fresh if the cached one has expired
    pub async fn market_snapshot(&self) -> MarketSnapshot {
        match self.cache.get().await {
            Some(snapshot) => snapshot,
            None => self.refresh_snapshot().await,
        }
    }

    async fn refresh_snapshot(&self) -> MarketSnapshot {
        let snapshot = fetch_snapshot(
            self.quote_provider.as_ref(),
            &self.watchlist,
            &self.basket,
            &self.market_config,
        )
        .await;
        self.cache.put(snapshot.clone()).await;
        snapshot
    }

    /// Admit fetched items past the dedup window into the news buffer;
    /// returns how many were new.
    pub async fn ingest_news(&self, items: Vec<NewsItem>) -> usize {
        let mut dedup = self.dedup.lock().await;
        let mut news = self.news.write().await;
        let mut admitted = 0;

        for item in items {
            if dedup.admit(&item.fingerprint) {
                news.push_back(item);
                admitted += 1;
            } else {
                debug!(fingerprint = %item.fingerprint, "duplicate item dropped");
            }
        }

        while news.len() > self.config.news_retention {
            news.pop_front();
        }
        admitted
    }

    /// The recent window with stale items removed: anything whose freshness
    /// has fully decayed never reaches event-card clustering.
    pub async fn event_window(&self) -> Vec<NewsItem> {
        let now = Utc::now();
        self.recent_news(self.config.recent_window)
            .await
            .into_iter()
            .filter(|item| {
                freshness_score(item.published_at, item.fetched_at, now, &self.freshness) > 0.0
            })
            .collect()
    }

    /// The most recently published items, newest first
    pub async fn recent_news(&self, limit: usize) -> Vec<NewsItem> {
        let news = self.news.read().await;
        let mut items: Vec<NewsItem> = news.iter().cloned().collect();
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        items.truncate(limit);
        items
    }

    /// Produce a full insight from a snapshot plus recent event cards.
    ///
    /// Never fails: backend errors and unparseable output both degrade to
    /// the deterministic fallback, which shares the same schema.
    pub async fn generate_insight(
        &self,
        snapshot: &MarketSnapshot,
        events: &[EventCard],
    ) -> Insight {
        let (draft, generator) = match &self.backend {
            Some(backend) => match self.generate_insight_draft(backend.as_ref(), snapshot, events).await {
                Ok(draft) => (draft, backend.model_name().to_string()),
                Err(reason) => {
                    warn!(%reason, "insight generation failed, using fallback");
                    (
                        fallback_insight(snapshot, events, &self.basket, &self.config),
                        "fallback".to_string(),
                    )
                }
            },
            None => (
                fallback_insight(snapshot, events, &self.basket, &self.config),
                "fallback".to_string(),
            ),
        };

        self.assemble_insight(draft, generator, events)
    }

    async fn generate_insight_draft(
        &self,
        backend: &dyn GenerativeBackend,
        snapshot: &MarketSnapshot,
        events: &[EventCard],
    ) -> Result<InsightDraft, String> {
        let prompt = prompts::insight_prompt(snapshot, events);
        let response = backend
            .generate(prompts::SYSTEM_PROMPT, &prompt, self.config.max_tokens)
            .await
            .map_err(|e| e.to_string())?;
        parse_insight(&response.text).map_err(|e| e.to_string())
    }

    fn assemble_insight(&self, draft: InsightDraft, generator: String, events: &[EventCard]) -> Insight {
        let credibilities: Vec<u8> = events
            .iter()
            .flat_map(|e| e.sources.iter().map(|s| s.credibility))
            .collect();
        let confidence = adjust_confidence(
            draft.confidence,
            credibilities.len(),
            mean_credibility(&credibilities),
            &self.config,
        );

        let created_at = Utc::now();
        Insight {
            id: format!(
                "ins-{}",
                fingerprint(draft.theses.first().map(String::as_str).unwrap_or(""), &created_at.to_rfc3339())
            ),
            theses: draft.theses,
            evidence: draft.evidence,
            counter_arguments: draft.counter_arguments,
            scenarios: draft.scenarios,
            confidence,
            risk_level: draft.risk_level,
            horizon: draft.horizon,
            asset_implications: draft.asset_implications,
            provenance: Provenance {
                generator,
                template_version: TEMPLATE_VERSION.to_string(),
                generated_at: created_at,
            },
            created_at,
        }
    }

    pub async fn list_news(&self, limit: usize) -> Vec<NewsItem> {
        self.recent_news(limit).await
    }

    pub async fn list_events(&self, limit: Option<usize>) -> Vec<EventCard> {
        self.events.list(limit).await
    }

    pub async fn list_insights(&self, limit: Option<usize>) -> Vec<Insight> {
        self.insights.list(limit).await
    }

    pub async fn list_alerts(&self, limit: Option<usize>) -> Vec<Alert> {
        self.alerts.list(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_core::NewsCategory;
    use llm_client::{BackendResult, GenerativeResponse};
    use market_data::StaticQuoteProvider;
    use std::time::Duration;

    struct StubBackend {
        reply: String,
    }

    #[async_trait]
    impl GenerativeBackend for StubBackend {
        async fn generate(
            &self,
            _system: &str,
            _prompt: &str,
            _max_tokens: u32,
        ) -> BackendResult<GenerativeResponse> {
            Ok(GenerativeResponse {
                text: self.reply.clone(),
                model: "stub-model".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    fn fast_market_config() -> MarketDataConfig {
        MarketDataConfig {
            batch_pause: Duration::from_millis(0),
            ..MarketDataConfig::default()
        }
    }

    fn orchestrator(backend: Option<Arc<dyn GenerativeBackend>>) -> Orchestrator {
        Orchestrator::new(
            Arc::new(StaticQuoteProvider::new()),
            backend,
            OrchestratorConfig::default(),
        )
        .unwrap()
        .with_sources(vec![])
        .with_market_config(fast_market_config())
    }

    fn item(title: &str, category: NewsCategory) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            published_at: Utc::now(),
            excerpt: String::new(),
            source: "Test Wire".to_string(),
            source_url: "https://feeds.example.com/t.json".to_string(),
            category,
            credibility: 85,
            fingerprint: fingerprint(title, "https://example.com"),
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn cycle_without_backend_completes_with_fallback_insight() {
        let orch = orchestrator(None);
        let outcome = orch.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Completed(_)));

        let insights = orch.list_insights(None).await;
        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert!(insight.provenance.is_fallback());
        assert!((10..=90).contains(&insight.confidence));
        assert_eq!(insight.provenance.template_version, TEMPLATE_VERSION);
    }

    #[tokio::test]
    async fn overlapping_cycle_is_skipped() {
        let orch = orchestrator(None);
        orch.cycle_running.store(true, Ordering::SeqCst);

        let outcome = orch.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::SkippedOverlap));
        assert!(orch.list_insights(None).await.is_empty());
    }

    #[tokio::test]
    async fn guard_released_after_completed_cycle() {
        let orch = orchestrator(None);
        assert!(matches!(orch.run_cycle().await, CycleOutcome::Completed(_)));
        assert!(matches!(orch.run_cycle().await, CycleOutcome::Completed(_)));
        assert_eq!(orch.list_insights(None).await.len(), 2);
    }

    #[tokio::test]
    async fn double_ingest_retains_one_copy() {
        let orch = orchestrator(None);
        let news = vec![item("Fed holds", NewsCategory::Macro)];

        assert_eq!(orch.ingest_news(news.clone()).await, 1);
        assert_eq!(orch.ingest_news(news).await, 0);
        assert_eq!(orch.list_news(100).await.len(), 1);
    }

    #[tokio::test]
    async fn fallback_insight_confidence_with_no_events() {
        let orch = orchestrator(None);
        let snapshot = orch.market_snapshot().await;

        let insight = orch.generate_insight(&snapshot, &[]).await;
        assert!(insight.provenance.is_fallback());
        // No sources means no adjustment: the fallback base passes through
        assert_eq!(insight.confidence, 25);
    }

    #[tokio::test]
    async fn generative_path_tags_model_and_adjusts_confidence() {
        let reply = r#"{"theses": ["Risk assets extend gains"],
            "evidence": [], "counter_arguments": [],
            "scenarios": {"base": "b", "bull": "u", "bear": "d"},
            "confidence": 50, "risk_level": "moderate",
            "horizon": "2 weeks", "asset_implications": []}"#;
        let orch = orchestrator(Some(Arc::new(StubBackend {
            reply: reply.to_string(),
        })));
        let snapshot = orch.market_snapshot().await;

        let insight = orch.generate_insight(&snapshot, &[]).await;
        assert_eq!(insight.provenance.generator, "stub-model");
        assert!(!insight.provenance.is_fallback());
        assert_eq!(insight.confidence, 50);
        assert_eq!(insight.theses[0], "Risk assets extend gains");
    }

    #[tokio::test]
    async fn garbage_backend_output_degrades_to_fallback() {
        let orch = orchestrator(Some(Arc::new(StubBackend {
            reply: "I cannot produce JSON today.".to_string(),
        })));
        let snapshot = orch.market_snapshot().await;

        let insight = orch.generate_insight(&snapshot, &[]).await;
        assert!(insight.provenance.is_fallback());
        assert_eq!(insight.confidence, 25);
    }

    #[tokio::test]
    async fn cycle_builds_cards_and_alerts_from_ingested_news() {
        let orch = orchestrator(None);
        let news: Vec<NewsItem> = (0..4)
            .map(|i| item(&format!("Macro story {}", i), NewsCategory::Macro))
            .collect();
        orch.ingest_news(news).await;

        let outcome = orch.run_cycle().await;
        let stats = match outcome {
            CycleOutcome::Completed(stats) => stats,
            other => panic!("expected completion, got {:?}", other),
        };

        assert_eq!(stats.cards_built, 1);
        let cards = orch.list_events(None).await;
        assert_eq!(cards[0].category, NewsCategory::Macro);
        assert_eq!(cards[0].impact, insight_core::ImpactLevel::High);
        // Fallback base 25 +10 corroboration +10 credibility = 45, below the
        // alert threshold, so the high-impact card raises no alert
        assert_eq!(stats.alerts_raised, 0);
    }

    #[tokio::test]
    async fn stale_news_never_reaches_event_cards() {
        let orch = orchestrator(None);
        let mut stale = item("Old macro story", NewsCategory::Macro);
        stale.published_at = Utc::now() - chrono::Duration::hours(30);
        orch.ingest_news(vec![stale]).await;

        let stats = match orch.run_cycle().await {
            CycleOutcome::Completed(stats) => stats,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(stats.cards_built, 0);
        // The stale item is retained for the news listing, just not clustered
        assert_eq!(orch.list_news(100).await.len(), 1);
        assert!(orch.event_window().await.is_empty());
    }

    #[tokio::test]
    async fn custom_basket_drives_fallback_theses() {
        let orch = orchestrator(None)
            .with_watchlist(vec![WatchSymbol::new("SPY", "S&P 500 ETF")])
            .with_basket(ReferenceBasket {
                equity: "SPY".to_string(),
                ..ReferenceBasket::default()
            });
        let snapshot = orch.market_snapshot().await;

        let insight = orch.generate_insight(&snapshot, &[]).await;
        assert!(insight.theses[0].contains("S&P 500 ETF"));
        assert!(!insight.theses.iter().any(|t| t.contains("indeterminate")));
    }

    #[tokio::test]
    async fn insight_event_window_bounds_evidence() {
        let config = OrchestratorConfig {
            insight_event_window: 1,
            ..OrchestratorConfig::default()
        };
        let orch = Orchestrator::new(Arc::new(StaticQuoteProvider::new()), None, config)
            .unwrap()
            .with_sources(vec![])
            .with_market_config(fast_market_config());
        orch.ingest_news(vec![
            item("Macro story", NewsCategory::Macro),
            item("Crypto story", NewsCategory::Crypto),
        ])
        .await;

        let stats = match orch.run_cycle().await {
            CycleOutcome::Completed(stats) => stats,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(stats.cards_built, 2);

        let insight = &orch.list_insights(None).await[0];
        assert_eq!(insight.evidence.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_cached_within_ttl() {
        let orch = orchestrator(None);
        let first = orch.market_snapshot().await;
        let second = orch.market_snapshot().await;
        assert_eq!(first.timestamp, second.timestamp);
    }
}
