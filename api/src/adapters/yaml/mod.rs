//! YAML adapters
//!
//! Operator-maintained configuration files read at runtime.

pub mod feed_definitions;

pub use feed_definitions::YamlFeedDefinitions;
