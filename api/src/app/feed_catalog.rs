//! Feed catalog
//!
//! Reconciles the operator's feed definitions with persisted feed records.
//! Definitions missing from the store are materialized lazily, once, the
//! first time the catalog is read after they appear.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{Feed, FeedDefinition, FeedWithCount, NewFeed};
use crate::domain::ports::{EventRepository, FeedDefinitionSource, FeedRepository};
use crate::error::DomainError;

pub struct FeedCatalog<FR, FD>
where
    FR: FeedRepository,
    FD: FeedDefinitionSource,
{
    feeds: Arc<FR>,
    definitions: Arc<FD>,
}

impl<FR, FD> FeedCatalog<FR, FD>
where
    FR: FeedRepository,
    FD: FeedDefinitionSource,
{
    pub fn new(feeds: Arc<FR>, definitions: Arc<FD>) -> Self {
        Self { feeds, definitions }
    }

    /// Bring the store up to date with the definitions and return every feed
    pub async fn resolve_all(&self) -> Result<Vec<Feed>, DomainError> {
        let definitions = self.definitions.load().await?;
        let feeds = self.feeds.find_all().await?;

        let stored: BTreeSet<&str> = feeds.iter().map(|f| f.feed_id.as_str()).collect();
        let missing: Vec<(&String, &FeedDefinition)> = definitions
            .iter()
            .filter(|(id, _)| !stored.contains(id.as_str()))
            .collect();

        if missing.is_empty() {
            return Ok(feeds);
        }

        let now = Utc::now();
        for (feed_id, definition) in missing {
            let created = self
                .feeds
                .insert_if_absent(&NewFeed::from_definition(feed_id, definition, now))
                .await?;
            if created {
                tracing::info!(feed_id = %feed_id, "Created feed from definitions");
            }
        }

        self.feeds.find_all().await
    }

    /// One feed, after reconciliation.
    ///
    /// Fails with `NotFound` when the id is in neither the store nor the
    /// definitions.
    pub async fn resolve(&self, feed_id: &str) -> Result<Feed, DomainError> {
        self.resolve_all()
            .await?
            .into_iter()
            .find(|f| f.feed_id == feed_id)
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "feed '{}' is not in the store or the feed definitions",
                    feed_id
                ))
            })
    }

    /// Every feed with the number of events it retains
    pub async fn resolve_all_with_counts<ER: EventRepository>(
        &self,
        events: &ER,
    ) -> Result<Vec<FeedWithCount>, DomainError> {
        let mut out = Vec::new();
        for feed in self.resolve_all().await? {
            let count = events.count(&feed.feed_id).await?.min(events.max_items());
            out.push(FeedWithCount { feed, count });
        }
        Ok(out)
    }

    /// Overwrite persisted records wholesale from the definitions.
    ///
    /// With `feed_id` only that feed is synced, and it must be defined.
    /// Returns the ids written.
    pub async fn sync(&self, feed_id: Option<&str>) -> Result<Vec<String>, DomainError> {
        let definitions = self.definitions.load().await?;
        let now = Utc::now();

        let targets: Vec<(&String, &FeedDefinition)> = match feed_id {
            Some(id) => {
                let entry = definitions.get_key_value(id).ok_or_else(|| {
                    DomainError::Configuration(format!(
                        "feed '{}' is not declared in {}",
                        id,
                        self.definitions.describe()
                    ))
                })?;
                vec![entry]
            }
            None => definitions.iter().collect(),
        };

        let mut synced = Vec::with_capacity(targets.len());
        for (id, definition) in targets {
            self.feeds
                .upsert(&NewFeed::from_definition(id, definition, now))
                .await?;
            tracing::info!(feed_id = %id, "Synced feed from definitions");
            synced.push(id.clone());
        }
        Ok(synced)
    }

    /// The declared definition of a feed, read fresh from the source
    pub async fn definition(&self, feed_id: &str) -> Result<Option<FeedDefinition>, DomainError> {
        Ok(self.definitions.load().await?.remove(feed_id))
    }

    pub fn definitions_source(&self) -> String {
        self.definitions.describe()
    }
}
