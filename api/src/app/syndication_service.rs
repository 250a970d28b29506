//! Syndication service
//!
//! Serves a feed's Atom document from the catalog and the event store.

use std::sync::Arc;

use chrono::Utc;

use super::FeedCatalog;
use crate::domain::ports::{EventRepository, FeedDefinitionSource, FeedRepository};
use crate::error::DomainError;
use crate::feed::{feed_self_url, render_atom};

pub struct SyndicationService<FR, FD, ER>
where
    FR: FeedRepository,
    FD: FeedDefinitionSource,
    ER: EventRepository,
{
    catalog: Arc<FeedCatalog<FR, FD>>,
    events: Arc<ER>,
    base_url: String,
}

/// Failures while reading for a render are rendering failures, except an
/// unknown feed, which callers report as such.
fn materialization_error(e: DomainError) -> DomainError {
    match e {
        DomainError::NotFound(_) | DomainError::Materialization(_) => e,
        other => DomainError::Materialization(other.to_string()),
    }
}

impl<FR, FD, ER> SyndicationService<FR, FD, ER>
where
    FR: FeedRepository,
    FD: FeedDefinitionSource,
    ER: EventRepository,
{
    pub fn new(catalog: Arc<FeedCatalog<FR, FD>>, events: Arc<ER>, base_url: String) -> Self {
        Self {
            catalog,
            events,
            base_url,
        }
    }

    /// Atom document for `feed_id`
    pub async fn atom(&self, feed_id: &str) -> Result<String, DomainError> {
        let feed = self
            .catalog
            .resolve(feed_id)
            .await
            .map_err(materialization_error)?;
        let events = self
            .events
            .list(feed_id)
            .await
            .map_err(materialization_error)?;

        tracing::debug!(feed_id = %feed_id, events = events.len(), "Rendering atom feed");

        Ok(render_atom(
            &feed,
            &events,
            &feed_self_url(&self.base_url, feed_id),
            Utc::now(),
        ))
    }
}
