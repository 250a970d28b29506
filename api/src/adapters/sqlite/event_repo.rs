//! SQLite adapter for EventRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{format_pub_date, parse_pub_date, Event, EventId, NewEvent};
use crate::domain::ports::EventRepository;
use crate::entity::events;
use crate::error::DomainError;

/// SQLite implementation of EventRepository
pub struct SqliteEventRepository {
    db: DatabaseConnection,
    max_items: u64,
}

impl SqliteEventRepository {
    pub fn new(db: DatabaseConnection, max_items: u64) -> Self {
        Self {
            db,
            max_items: max_items.max(1),
        }
    }
}

/// Delete every event of `feed_id` outside the newest `max_items`.
///
/// Newest means highest `(event_pub_date, event_id)`: events of one batch
/// share a timestamp, so insertion order breaks ties.
async fn prune<C: ConnectionTrait>(
    conn: &C,
    feed_id: &str,
    max_items: u64,
) -> Result<u64, DbErr> {
    let keep: Vec<i64> = events::Entity::find()
        .select_only()
        .column(events::Column::EventId)
        .filter(events::Column::FeedId.eq(feed_id))
        .order_by_desc(events::Column::EventPubDate)
        .order_by_desc(events::Column::EventId)
        .limit(max_items)
        .into_tuple()
        .all(conn)
        .await?;

    let result = events::Entity::delete_many()
        .filter(events::Column::FeedId.eq(feed_id))
        .filter(events::Column::EventId.is_not_in(keep))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    fn max_items(&self) -> u64 {
        self.max_items
    }

    async fn insert_batch(
        &self,
        feed_id: &str,
        new_events: &[NewEvent],
    ) -> Result<Vec<EventId>, DomainError> {
        if new_events.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(stray) = new_events.iter().find(|e| e.feed_id != feed_id) {
            return Err(DomainError::Store(format!(
                "event for feed '{}' in batch for feed '{}'",
                stray.feed_id, feed_id
            )));
        }

        // Dropping the transaction on any early return rolls it back.
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let mut ids = Vec::with_capacity(new_events.len());
        for event in new_events {
            let model = events::ActiveModel {
                event_id: NotSet,
                feed_id: Set(event.feed_id.clone()),
                event_title: Set(event.title.clone()),
                event_description: Set(event.description.clone()),
                event_link: Set(event.link.clone()),
                event_guid: Set(event.guid.clone()),
                event_pub_date: Set(format_pub_date(&event.pub_date)),
                raw_msg: Set(event.raw_msg.clone()),
                msg_hash: Set(event.msg_hash.clone()),
                is_test: Set(event.is_test),
            };

            let result = events::Entity::insert(model)
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Store(e.to_string()))?;
            ids.push(EventId(result.last_insert_id));
        }

        let evicted = prune(&txn, feed_id, self.max_items)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        tracing::debug!(
            feed_id = %feed_id,
            inserted = ids.len(),
            evicted,
            "Events stored"
        );

        Ok(ids)
    }

    async fn list(&self, feed_id: &str) -> Result<Vec<Event>, DomainError> {
        let results = events::Entity::find()
            .filter(events::Column::FeedId.eq(feed_id))
            .order_by_desc(events::Column::EventPubDate)
            .order_by_desc(events::Column::EventId)
            .limit(self.max_items)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        results.into_iter().map(Event::try_from).collect()
    }

    async fn count(&self, feed_id: &str) -> Result<u64, DomainError> {
        events::Entity::find()
            .filter(events::Column::FeedId.eq(feed_id))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<events::Model> for Event {
    type Error = DomainError;

    fn try_from(model: events::Model) -> Result<Self, Self::Error> {
        let pub_date = parse_pub_date(&model.event_pub_date).map_err(|e| {
            DomainError::Store(format!(
                "event {} has unreadable pub date '{}': {}",
                model.event_id, model.event_pub_date, e
            ))
        })?;

        Ok(Event {
            id: EventId(model.event_id),
            feed_id: model.feed_id,
            title: model.event_title,
            description: model.event_description,
            link: model.event_link,
            guid: model.event_guid,
            pub_date,
            raw_msg: model.raw_msg,
            msg_hash: model.msg_hash,
            is_test: model.is_test,
        })
    }
}
