//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::entities::{Event, EventId, Feed, FeedDefinition, NewEvent, NewFeed, RawItem};
use crate::domain::ports::{
    EventRepository, FeedDefinitionSource, FeedDefinitions, FeedRepository, Transform,
    TransformSource, TransformTable,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory Event Repository
// ============================================================================

pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
    next_id: AtomicI64,
    max_items: u64,
    fail_reads: AtomicBool,
}

impl InMemoryEventRepository {
    pub fn new(max_items: u64) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            max_items: max_items.max(1),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// A copy of the stored rows under a different limit, as after a restart
    /// with a new `max_items`. Nothing is pruned until the next insert.
    pub fn reopen_with_max_items(&self, max_items: u64) -> Self {
        let stored = self.events.read().unwrap().clone();
        Self {
            events: RwLock::new(stored),
            next_id: AtomicI64::new(self.next_id.load(Ordering::SeqCst)),
            max_items: max_items.max(1),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make `list` and `count` fail with a store error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Store("reads disabled".to_string()));
        }
        Ok(())
    }

    /// Events of one feed, newest first
    fn window(events: &[Event], feed_id: &str) -> Vec<Event> {
        let mut selected: Vec<Event> = events
            .iter()
            .filter(|e| e.feed_id == feed_id)
            .cloned()
            .collect();
        selected.sort_by(|a, b| (b.pub_date, b.id).cmp(&(a.pub_date, a.id)));
        selected
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    fn max_items(&self) -> u64 {
        self.max_items
    }

    async fn insert_batch(
        &self,
        feed_id: &str,
        events: &[NewEvent],
    ) -> Result<Vec<EventId>, DomainError> {
        if let Some(other) = events.iter().find(|e| e.feed_id != feed_id) {
            return Err(DomainError::Store(format!(
                "event for feed '{}' in batch for '{}'",
                other.feed_id, feed_id
            )));
        }

        let mut stored = self.events.write().unwrap();
        let mut ids = Vec::with_capacity(events.len());
        for event in events {
            let id = EventId(self.next_id.fetch_add(1, Ordering::SeqCst));
            stored.push(Event {
                id,
                feed_id: event.feed_id.clone(),
                title: event.title.clone(),
                description: event.description.clone(),
                link: event.link.clone(),
                guid: event.guid.clone(),
                pub_date: event.pub_date,
                raw_msg: event.raw_msg.clone(),
                msg_hash: event.msg_hash.clone(),
                is_test: event.is_test,
            });
            ids.push(id);
        }

        let keep: Vec<EventId> = Self::window(&stored, feed_id)
            .into_iter()
            .take(self.max_items as usize)
            .map(|e| e.id)
            .collect();
        stored.retain(|e| e.feed_id != feed_id || keep.contains(&e.id));

        Ok(ids)
    }

    async fn list(&self, feed_id: &str) -> Result<Vec<Event>, DomainError> {
        self.check_reads()?;
        let stored = self.events.read().unwrap();
        Ok(Self::window(&stored, feed_id)
            .into_iter()
            .take(self.max_items as usize)
            .collect())
    }

    async fn count(&self, feed_id: &str) -> Result<u64, DomainError> {
        self.check_reads()?;
        let stored = self.events.read().unwrap();
        Ok(stored.iter().filter(|e| e.feed_id == feed_id).count() as u64)
    }
}

// ============================================================================
// In-Memory Feed Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryFeedRepository {
    feeds: RwLock<BTreeMap<String, Feed>>,
    created: AtomicUsize,
}

impl InMemoryFeedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records created by `insert_if_absent`
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

fn feed_from_new(feed: &NewFeed) -> Feed {
    Feed {
        feed_id: feed.feed_id.clone(),
        name: feed.name.clone(),
        description: feed.description.clone(),
        icon_url: feed.icon_url.clone(),
        url: feed.url.clone(),
        created_at: feed.created_at,
        token: feed.token.clone(),
    }
}

#[async_trait]
impl FeedRepository for InMemoryFeedRepository {
    async fn find_all(&self) -> Result<Vec<Feed>, DomainError> {
        Ok(self.feeds.read().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, feed_id: &str) -> Result<Option<Feed>, DomainError> {
        Ok(self.feeds.read().unwrap().get(feed_id).cloned())
    }

    async fn insert_if_absent(&self, feed: &NewFeed) -> Result<bool, DomainError> {
        let mut feeds = self.feeds.write().unwrap();
        if feeds.contains_key(&feed.feed_id) {
            return Ok(false);
        }
        feeds.insert(feed.feed_id.clone(), feed_from_new(feed));
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn upsert(&self, feed: &NewFeed) -> Result<(), DomainError> {
        self.feeds
            .write()
            .unwrap()
            .insert(feed.feed_id.clone(), feed_from_new(feed));
        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

// ============================================================================
// In-Memory Feed Definitions
// ============================================================================

#[derive(Default)]
pub struct InMemoryFeedDefinitions {
    definitions: RwLock<FeedDefinitions>,
}

impl InMemoryFeedDefinitions {
    pub fn new(definitions: &[(&str, FeedDefinition)]) -> Self {
        Self {
            definitions: RwLock::new(
                definitions
                    .iter()
                    .map(|(id, def)| (id.to_string(), def.clone()))
                    .collect(),
            ),
        }
    }

    /// Add or replace one definition
    pub fn set(&self, feed_id: &str, definition: FeedDefinition) {
        self.definitions
            .write()
            .unwrap()
            .insert(feed_id.to_string(), definition);
    }
}

#[async_trait]
impl FeedDefinitionSource for InMemoryFeedDefinitions {
    async fn load(&self) -> Result<FeedDefinitions, DomainError> {
        Ok(self.definitions.read().unwrap().clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

// ============================================================================
// Transforms
// ============================================================================

/// Returns the same items for every payload and records the feed ids it saw
pub struct FixedTransform {
    items: Vec<RawItem>,
    calls: Mutex<Vec<String>>,
}

impl FixedTransform {
    pub fn new(items: Vec<RawItem>) -> Self {
        Self {
            items,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transform for FixedTransform {
    fn name(&self) -> &str {
        "fixed"
    }

    fn transform(&self, _payload: &Value, feed_id: &str) -> Result<Vec<RawItem>, DomainError> {
        self.calls.lock().unwrap().push(feed_id.to_string());
        Ok(self.items.clone())
    }
}

/// Rejects every payload
pub struct FailingTransform;

impl Transform for FailingTransform {
    fn name(&self) -> &str {
        "failing"
    }

    fn transform(&self, _payload: &Value, _feed_id: &str) -> Result<Vec<RawItem>, DomainError> {
        Err(DomainError::Transform("payload rejected".to_string()))
    }
}

/// Builds a table with one `FixedTransform` per listed feed id.
///
/// Both fields are shared so tests can change what the next load returns.
pub struct StaticTransformSource {
    pub feeds: Arc<Mutex<Vec<String>>>,
    pub fail: Arc<AtomicBool>,
}

impl StaticTransformSource {
    pub fn new(feeds: &[&str]) -> Self {
        Self {
            feeds: Arc::new(Mutex::new(feeds.iter().map(|f| f.to_string()).collect())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl TransformSource for StaticTransformSource {
    fn load(&self) -> Result<TransformTable, DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Configuration("source unavailable".to_string()));
        }
        Ok(self
            .feeds
            .lock()
            .unwrap()
            .iter()
            .map(|feed_id| {
                let transform: Arc<dyn Transform> = Arc::new(FixedTransform::new(vec![
                    RawItem::new(feed_id.clone(), "static", "http://static"),
                ]));
                (feed_id.clone(), transform)
            })
            .collect())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
