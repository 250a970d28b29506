//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod sqlite;
pub mod template;
pub mod yaml;

pub use sqlite::{SqliteEventRepository, SqliteFeedRepository};
pub use template::YamlTransformSource;
pub use yaml::YamlFeedDefinitions;
