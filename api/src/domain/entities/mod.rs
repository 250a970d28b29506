//! Domain entities
//!
//! Pure domain models representing feeds and the events they carry.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod event;
pub mod feed;

pub use event::{format_pub_date, parse_pub_date, Event, EventId, NewEvent, RawItem};
pub use feed::{Feed, FeedDefinition, FeedWithCount, NewFeed};
