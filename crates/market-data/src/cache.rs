use chrono::{DateTime, Utc};
use insight_core::MarketSnapshot;
use std::time::Duration;
use tokio::sync::RwLock;

struct CacheEntry {
    snapshot: MarketSnapshot,
    cached_at: DateTime<Utc>,
}

/// Single-slot TTL cache for the latest market snapshot.
///
/// One writer (the fetch cycle), many readers. The entry is replaced
/// atomically as a whole object; readers never observe a partial update.
pub struct SnapshotCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// The cached snapshot, if still within its TTL
    pub async fn get(&self) -> Option<MarketSnapshot> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        let age = (Utc::now() - entry.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);
        if age < self.ttl {
            Some(entry.snapshot.clone())
        } else {
            None
        }
    }

    pub async fn put(&self, snapshot: MarketSnapshot) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            snapshot,
            cached_at: Utc::now(),
        });
    }
}
