//! Ingest service
//!
//! The webhook pipeline: resolve the feed's transformation, run it over the
//! payload, normalize the output and hand the batch to the event store.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::normalizer;
use super::TransformRegistry;
use crate::domain::entities::EventId;
use crate::domain::ports::EventRepository;
use crate::error::DomainError;

/// Result of one successful ingestion call
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub feed_id: String,
    pub event_ids: Vec<EventId>,
    pub titles: Vec<String>,
}

/// Service for turning webhook payloads into stored events
pub struct IngestService<ER>
where
    ER: EventRepository,
{
    registry: Arc<TransformRegistry>,
    events: Arc<ER>,
}

impl<ER> IngestService<ER>
where
    ER: EventRepository,
{
    pub fn new(registry: Arc<TransformRegistry>, events: Arc<ER>) -> Self {
        Self { registry, events }
    }

    /// Ingest one payload for `feed_id`, archiving `raw_msg` (the body as
    /// received) verbatim.
    ///
    /// All items are normalized before anything is written, and the batch is
    /// stored in one transaction: the call commits every event or none.
    pub async fn ingest(
        &self,
        feed_id: &str,
        payload: &Value,
        raw_msg: &str,
    ) -> Result<IngestOutcome, DomainError> {
        if !payload.is_object() {
            return Err(DomainError::Transform(format!(
                "payload for feed '{}' must be a JSON object",
                feed_id
            )));
        }

        let transform = self.registry.resolve(feed_id)?;
        let items = transform.transform(payload, feed_id)?;
        let events = normalizer::normalize(feed_id, payload, raw_msg, items)?;
        let titles: Vec<String> = events.iter().map(|e| e.title.clone()).collect();

        let event_ids = self.events.insert_batch(feed_id, &events).await?;

        for (id, title) in event_ids.iter().zip(&titles) {
            tracing::info!(feed_id = %feed_id, event_id = %id, title = %title, "Added event");
        }

        Ok(IngestOutcome {
            feed_id: feed_id.to_string(),
            event_ids,
            titles,
        })
    }
}
