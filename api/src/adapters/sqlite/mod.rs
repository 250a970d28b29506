//! SQLite adapters
//!
//! Implementations of repository traits using SeaORM and SQLite.

pub mod event_repo;
pub mod feed_repo;
pub mod schema;


pub use event_repo::SqliteEventRepository;
pub use feed_repo::SqliteFeedRepository;
pub use schema::{connect, init_schema};
