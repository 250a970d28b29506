//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod diagnostics;
pub mod feed_catalog;
pub mod ingest_service;
pub mod normalizer;
pub mod syndication_service;
pub mod transform_registry;

pub use diagnostics::Diagnostics;
pub use feed_catalog::FeedCatalog;
pub use ingest_service::IngestService;
pub use syndication_service::SyndicationService;
pub use transform_registry::TransformRegistry;
