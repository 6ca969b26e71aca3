use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};

/// Decay windows for the freshness blend. Policy values, not derived.
#[derive(Debug, Clone)]
pub struct FreshnessConfig {
    pub publish_decay_hours: f64,
    pub fetch_decay_hours: f64,
    pub publish_weight: f64,
    pub fetch_weight: f64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            publish_decay_hours: 24.0,
            fetch_decay_hours: 6.0,
            publish_weight: 0.7,
            fetch_weight: 0.3,
        }
    }
}

/// Decaying [0, 1] freshness of an item.
///
/// Weighted blend of two linear decays, each clamped to [0, 1] first.
/// An item whose publish age has fully decayed is stale outright,
/// whatever its fetch age.
pub fn freshness_score(
    published_at: DateTime<Utc>,
    fetched_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &FreshnessConfig,
) -> f64 {
    let publish_age_hours = (now - published_at).num_seconds().max(0) as f64 / 3600.0;
    let fetch_age_hours = (now - fetched_at).num_seconds().max(0) as f64 / 3600.0;

    if publish_age_hours >= config.publish_decay_hours {
        return 0.0;
    }

    let publish_component = (1.0 - publish_age_hours / config.publish_decay_hours).clamp(0.0, 1.0);
    let fetch_component = (1.0 - fetch_age_hours / config.fetch_decay_hours).clamp(0.0, 1.0);

    (config.publish_weight * publish_component + config.fetch_weight * fetch_component)
        .clamp(0.0, 1.0)
}

/// Fingerprint window with ring-buffer retention.
///
/// An item is new iff its fingerprint has not been seen among the retained
/// set. Once past the cap the oldest fingerprints are evicted first — plain
/// insertion order, not LRU.
pub struct DedupWindow {
    seen: HashSet<String>,
    order: VecDeque<String>,
    retention: usize,
}

impl DedupWindow {
    pub fn new(retention: usize) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            retention: retention.max(1),
        }
    }

    /// Admit a fingerprint; returns false when it is a duplicate
    pub fn admit(&mut self, fingerprint: &str) -> bool {
        if self.seen.contains(fingerprint) {
            return false;
        }

        self.seen.insert(fingerprint.to_string());
        self.order.push_back(fingerprint.to_string());
        while self.order.len() > self.retention {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cfg() -> FreshnessConfig {
        FreshnessConfig::default()
    }

    #[test]
    fn freshness_is_one_at_zero_age() {
        let now = Utc::now();
        assert_eq!(freshness_score(now, now, now, &cfg()), 1.0);
    }

    #[test]
    fn freshness_zero_once_publish_age_exceeds_window() {
        let now = Utc::now();
        let published = now - Duration::hours(24);
        // Fetch age of zero does not rescue a fully decayed publish age
        assert_eq!(freshness_score(published, now, now, &cfg()), 0.0);
    }

    #[test]
    fn freshness_monotonically_non_increasing_in_publish_age() {
        let now = Utc::now();
        let fetched = now;
        let mut last = f64::MAX;
        for hours in 0..30 {
            let published = now - Duration::hours(hours);
            let score = freshness_score(published, fetched, now, &cfg());
            assert!(score <= last, "increased at {}h", hours);
            last = score;
        }
    }

    #[test]
    fn freshness_monotonically_non_increasing_in_fetch_age() {
        let now = Utc::now();
        let published = now - Duration::hours(2);
        let mut last = f64::MAX;
        for hours in 0..10 {
            let fetched = now - Duration::hours(hours);
            let score = freshness_score(published, fetched, now, &cfg());
            assert!(score <= last, "increased at {}h", hours);
            last = score;
        }
    }

    #[test]
    fn freshness_blend_weights() {
        let now = Utc::now();
        // Publish 12h old (component 0.5), fetch 6h old (component 0.0)
        let published = now - Duration::hours(12);
        let fetched = now - Duration::hours(6);
        let score = freshness_score(published, fetched, now, &cfg());
        assert!((score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn duplicate_fingerprint_rejected() {
        let mut window = DedupWindow::new(10);
        assert!(window.admit("abc"));
        assert!(!window.admit("abc"));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn eviction_is_oldest_first_and_readmits() {
        let mut window = DedupWindow::new(2);
        assert!(window.admit("a"));
        assert!(window.admit("b"));
        assert!(window.admit("c")); // evicts "a"

        assert_eq!(window.len(), 2);
        assert!(window.admit("a"), "evicted fingerprint is new again");
        assert!(!window.admit("c"));
    }
}
