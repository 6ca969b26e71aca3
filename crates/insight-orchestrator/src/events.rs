use chrono::Utc;
use insight_core::{EventCard, NewsCategory, NewsItem, Provenance, SourceRef};
use llm_client::GenerativeBackend;
use news_feed::fingerprint;
use tracing::{debug, warn};

use crate::config::OrchestratorConfig;
use crate::confidence::{adjust_confidence, mean_credibility};
use crate::fallback::fallback_event_card;
use crate::parser::{parse_event_card, EventCardDraft};
use crate::prompts::{self, TEMPLATE_VERSION};

const CATEGORY_ORDER: [NewsCategory; 6] = [
    NewsCategory::Macro,
    NewsCategory::Equities,
    NewsCategory::Crypto,
    NewsCategory::Commodities,
    NewsCategory::Rates,
    NewsCategory::General,
];

/// Group a news window into per-category clusters, fixed category order.
/// Empty clusters are dropped: no cluster, no card.
pub fn cluster_by_category(items: &[NewsItem]) -> Vec<(NewsCategory, Vec<NewsItem>)> {
    CATEGORY_ORDER
        .iter()
        .filter_map(|&category| {
            let cluster: Vec<NewsItem> = items
                .iter()
                .filter(|i| i.category == category)
                .cloned()
                .collect();
            if cluster.is_empty() {
                None
            } else {
                Some((category, cluster))
            }
        })
        .collect()
}

/// Produce one event card per non-empty cluster.
///
/// Backend failures degrade to the templated fallback per cluster; one bad
/// cluster never blocks the others. The confidence adjustment runs exactly
/// once per card, whichever path produced the draft.
pub async fn build_event_cards(
    backend: Option<&dyn GenerativeBackend>,
    items: &[NewsItem],
    config: &OrchestratorConfig,
) -> Vec<EventCard> {
    let mut cards = Vec::new();

    for (category, cluster) in cluster_by_category(items) {
        let (draft, generator) = match backend {
            Some(backend) => match generate_draft(backend, category, &cluster, config).await {
                Ok(draft) => (draft, backend.model_name().to_string()),
                Err(reason) => {
                    warn!(category = category.as_str(), %reason, "event card generation failed, using fallback");
                    (fallback_event_card(category, &cluster, config), "fallback".to_string())
                }
            },
            None => (fallback_event_card(category, &cluster, config), "fallback".to_string()),
        };

        cards.push(assemble_card(draft, generator, category, &cluster, config));
        debug!(category = category.as_str(), items = cluster.len(), "event card built");
    }

    cards
}

async fn generate_draft(
    backend: &dyn GenerativeBackend,
    category: NewsCategory,
    cluster: &[NewsItem],
    config: &OrchestratorConfig,
) -> Result<EventCardDraft, String> {
    let prompt = prompts::event_card_prompt(category.as_str(), cluster);
    let response = backend
        .generate(prompts::SYSTEM_PROMPT, &prompt, config.max_tokens)
        .await
        .map_err(|e| e.to_string())?;
    parse_event_card(&response.text).map_err(|e| e.to_string())
}

fn assemble_card(
    draft: EventCardDraft,
    generator: String,
    category: NewsCategory,
    cluster: &[NewsItem],
    config: &OrchestratorConfig,
) -> EventCard {
    let credibilities: Vec<u8> = cluster.iter().map(|i| i.credibility).collect();
    let confidence = adjust_confidence(
        draft.confidence,
        cluster.len(),
        mean_credibility(&credibilities),
        config,
    );

    let created_at = Utc::now();
    EventCard {
        id: format!("evt-{}", fingerprint(&draft.title, &created_at.to_rfc3339())),
        title: draft.title,
        summary: draft.summary,
        category,
        impact: draft.impact,
        affected_assets: draft.affected_assets,
        confidence,
        rationale: draft.rationale,
        sources: cluster
            .iter()
            .map(|i| SourceRef {
                name: i.source.clone(),
                url: i.url.clone(),
                credibility: i.credibility,
            })
            .collect(),
        provenance: Provenance {
            generator,
            template_version: TEMPLATE_VERSION.to_string(),
            generated_at: created_at,
        },
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(title: &str, category: NewsCategory, credibility: u8) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            published_at: Utc::now(),
            excerpt: String::new(),
            source: "Test Wire".to_string(),
            source_url: "https://feeds.example.com/t.json".to_string(),
            category,
            credibility,
            fingerprint: fingerprint(title, "u"),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn clustering_groups_by_category_and_drops_empty() {
        let items = vec![
            item("a", NewsCategory::Macro, 90),
            item("b", NewsCategory::Crypto, 65),
            item("c", NewsCategory::Macro, 85),
        ];

        let clusters = cluster_by_category(&items);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].0, NewsCategory::Macro);
        assert_eq!(clusters[0].1.len(), 2);
        assert_eq!(clusters[1].0, NewsCategory::Crypto);
    }

    #[tokio::test]
    async fn no_backend_yields_fallback_cards() {
        let items = vec![
            item("Fed holds", NewsCategory::Macro, 90),
            item("CPI cools", NewsCategory::Macro, 85),
            item("Jobs strong", NewsCategory::Macro, 80),
        ];

        let cards = build_event_cards(None, &items, &OrchestratorConfig::default()).await;
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert!(card.provenance.is_fallback());
        assert_eq!(card.title, "Fed holds");
        assert_eq!(card.sources.len(), 3);
        // 25 base + 10 corroboration + 10 high credibility = 45
        assert_eq!(card.confidence, 45);
        assert_eq!(card.provenance.template_version, TEMPLATE_VERSION);
    }

    #[tokio::test]
    async fn empty_window_yields_no_cards() {
        let cards = build_event_cards(None, &[], &OrchestratorConfig::default()).await;
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn single_low_credibility_source_is_floored() {
        let items = vec![item("Rumor", NewsCategory::General, 30)];
        let cards = build_event_cards(None, &items, &OrchestratorConfig::default()).await;
        // 25 base - 15 single source - 20 low credibility, clamped to the floor
        assert_eq!(cards[0].confidence, 10);
    }
}
