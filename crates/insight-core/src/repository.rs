use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::InsightError;

/// Identity for stored artifacts
pub trait HasId {
    fn id(&self) -> &str;
}

/// Bounded artifact store injected into the orchestrator.
///
/// Keeps the core off process-wide state: data comes in via `append`,
/// goes out via `list`/`find_by_id`, and the oldest entries are evicted
/// once the retention cap is exceeded.
#[async_trait]
pub trait ArtifactRepository<T: Clone + Send + Sync>: Send + Sync {
    async fn append(&self, item: T) -> Result<(), InsightError>;

    /// Newest-first listing, optionally limited
    async fn list(&self, limit: Option<usize>) -> Vec<T>;

    async fn find_by_id(&self, id: &str) -> Option<T>;

    async fn len(&self) -> usize;
}

/// In-memory repository with ring-buffer retention
pub struct MemoryRepository<T> {
    items: RwLock<VecDeque<T>>,
    capacity: usize,
}

impl<T> MemoryRepository<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new(200)
    }
}

#[async_trait]
impl<T: HasId + Clone + Send + Sync> ArtifactRepository<T> for MemoryRepository<T> {
    async fn append(&self, item: T) -> Result<(), InsightError> {
        let mut items = self.items.write().await;
        items.push_back(item);
        while items.len() > self.capacity {
            items.pop_front();
        }
        Ok(())
    }

    async fn list(&self, limit: Option<usize>) -> Vec<T> {
        let items = self.items.read().await;
        let take = limit.unwrap_or(items.len());
        items.iter().rev().take(take).cloned().collect()
    }

    async fn find_by_id(&self, id: &str) -> Option<T> {
        let items = self.items.read().await;
        items.iter().find(|i| i.id() == id).cloned()
    }

    async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

impl HasId for crate::EventCard {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for crate::Insight {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for crate::Alert {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl HasId for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    #[tokio::test]
    async fn append_and_find() {
        let repo = MemoryRepository::new(10);
        repo.append(Item("a".into())).await.unwrap();
        repo.append(Item("b".into())).await.unwrap();

        assert_eq!(repo.len().await, 2);
        assert_eq!(repo.find_by_id("a").await, Some(Item("a".into())));
        assert_eq!(repo.find_by_id("c").await, None);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let repo = MemoryRepository::new(10);
        for id in ["a", "b", "c"] {
            repo.append(Item(id.into())).await.unwrap();
        }

        let listed = repo.list(Some(2)).await;
        assert_eq!(listed, vec![Item("c".into()), Item("b".into())]);
    }

    #[tokio::test]
    async fn retention_evicts_oldest_first() {
        let repo = MemoryRepository::new(2);
        for id in ["a", "b", "c"] {
            repo.append(Item(id.into())).await.unwrap();
        }

        assert_eq!(repo.len().await, 2);
        assert_eq!(repo.find_by_id("a").await, None);
        assert_eq!(repo.find_by_id("c").await, Some(Item("c".into())));
    }
}
