//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::app::normalizer::make_guid;
use crate::config::Config;
use crate::domain::entities::{format_pub_date, Event, EventId, Feed, FeedDefinition, NewEvent};

/// Create a feed definition with display metadata filled in
pub fn test_definition(name: &str) -> FeedDefinition {
    FeedDefinition {
        name: name.to_string(),
        description: format!("{} events", name),
        icon_url: "https://example.org/icon.png".to_string(),
        url: "https://example.org".to_string(),
        token: None,
    }
}

/// Create a feed record named "Feed {feed_id}"
pub fn test_feed(feed_id: &str) -> Feed {
    Feed {
        feed_id: feed_id.to_string(),
        name: format!("Feed {}", feed_id),
        description: format!("Events for {}", feed_id),
        icon_url: "https://example.org/icon.png".to_string(),
        url: format!("https://example.org/{}", feed_id),
        created_at: Utc::now(),
        token: None,
    }
}

/// Create a normalized event published now
pub fn test_new_event(feed_id: &str, title: &str) -> NewEvent {
    let pub_date = Utc::now();
    NewEvent {
        feed_id: feed_id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        link: format!("https://example.org/{}/{}", feed_id, title),
        guid: make_guid(&format_pub_date(&pub_date), title),
        pub_date,
        raw_msg: "{}".to_string(),
        msg_hash: "12ae32cb1ec02d01eda3581b".to_string(),
        is_test: false,
    }
}

/// Create a normalized event with an explicit publication time
pub fn test_new_event_at(feed_id: &str, title: &str, pub_date: DateTime<Utc>) -> NewEvent {
    NewEvent {
        guid: make_guid(&format_pub_date(&pub_date), title),
        pub_date,
        ..test_new_event(feed_id, title)
    }
}

/// Create a persisted event
pub fn test_event(id: i64, feed_id: &str, title: &str, pub_date: DateTime<Utc>) -> Event {
    let new = test_new_event_at(feed_id, title, pub_date);
    Event {
        id: EventId(id),
        feed_id: new.feed_id,
        title: new.title,
        description: new.description,
        link: new.link,
        guid: new.guid,
        pub_date: new.pub_date,
        raw_msg: new.raw_msg,
        msg_hash: new.msg_hash,
        is_test: new.is_test,
    }
}

/// Config pointing at an in-memory database with rate limiting off
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        max_items: 50,
        port: 8855,
        base_url: "http://localhost:8855".to_string(),
        feed_definitions: PathBuf::from("feeds.yaml"),
        transforms: PathBuf::from("transforms.yaml"),
        rate_limit: false,
    }
}
