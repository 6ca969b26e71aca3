use chrono::Utc;
use insight_core::{Alert, EventCard, ImpactLevel};
use news_feed::fingerprint;

use crate::config::OrchestratorConfig;

/// Raise alerts for high-impact cards the engine is reasonably sure about.
/// Low-confidence high-impact cards stay cards; noisy alerts erode trust.
pub fn detect_alerts(cards: &[EventCard], config: &OrchestratorConfig) -> Vec<Alert> {
    cards
        .iter()
        .filter(|card| {
            card.impact == ImpactLevel::High && card.confidence >= config.alert_min_confidence
        })
        .map(|card| {
            let triggered_at = Utc::now();
            Alert {
                id: format!("alr-{}", fingerprint(&card.id, &triggered_at.to_rfc3339())),
                headline: card.title.clone(),
                severity: card.impact,
                category: card.category,
                event_id: card.id.clone(),
                triggered_at,
            }
        })
        .collect()
}
