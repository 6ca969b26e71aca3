/// Policy values for artifact generation.
///
/// These are configuration, not derived constants; the defaults are load
/// bearing for downstream compatibility and must not drift.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How many of the most recent news items feed event-card clustering
    pub recent_window: usize,
    /// How many recent event cards feed insight generation
    pub insight_event_window: usize,
    /// Fingerprints retained for deduplication
    pub dedup_retention: usize,
    /// Raw news items retained for the outward contract
    pub news_retention: usize,
    /// Artifacts retained per repository
    pub artifact_retention: usize,
    /// Base confidence for fallback-synthesized artifacts
    pub fallback_confidence: u8,
    /// Clamp bounds applied by the confidence adjustment
    pub confidence_floor: u8,
    pub confidence_ceiling: u8,
    /// Minimum adjusted confidence for a High-impact card to raise an alert
    pub alert_min_confidence: u8,
    /// Response-size bound passed to the generative backend
    pub max_tokens: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            recent_window: 30,
            insight_event_window: 10,
            dedup_retention: 500,
            news_retention: 200,
            artifact_retention: 200,
            fallback_confidence: 25,
            confidence_floor: 10,
            confidence_ceiling: 90,
            alert_min_confidence: 60,
            max_tokens: 1024,
        }
    }
}
