//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., SQLite).

use async_trait::async_trait;

use crate::domain::entities::{Event, EventId, Feed, NewEvent, NewFeed};
use crate::error::DomainError;

/// Bounded, per-feed event history
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Retention window: the most events kept for any one feed
    fn max_items(&self) -> u64;

    /// Insert one event and evict everything beyond the retention window for
    /// its feed, atomically. Returns the store-assigned id.
    async fn insert(&self, event: &NewEvent) -> Result<EventId, DomainError> {
        let ids = self
            .insert_batch(&event.feed_id, std::slice::from_ref(event))
            .await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| DomainError::Store("insert returned no id".to_string()))
    }

    /// Insert several events for one feed and prune, as a single transaction.
    ///
    /// Either every event is committed with the prune applied, or nothing is.
    async fn insert_batch(
        &self,
        feed_id: &str,
        events: &[NewEvent],
    ) -> Result<Vec<EventId>, DomainError>;

    /// Up to `max_items` events for a feed, newest first
    async fn list(&self, feed_id: &str) -> Result<Vec<Event>, DomainError>;

    /// Number of events currently retained for a feed
    async fn count(&self, feed_id: &str) -> Result<u64, DomainError>;
}

/// Persisted feed records
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// All persisted feeds, ordered by id
    async fn find_all(&self) -> Result<Vec<Feed>, DomainError>;

    /// Find a feed by id
    async fn find_by_id(&self, feed_id: &str) -> Result<Option<Feed>, DomainError>;

    /// Insert a feed unless one with the same id exists. Returns whether a
    /// row was created.
    async fn insert_if_absent(&self, feed: &NewFeed) -> Result<bool, DomainError>;

    /// Insert or wholesale replace a feed record
    async fn upsert(&self, feed: &NewFeed) -> Result<(), DomainError>;

    /// Cheap round-trip to check the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
