//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod diagnostics;
pub mod feeds;
pub mod webhooks;

pub use diagnostics::{get_diagnostics, healthz};
pub use feeds::{get_atom, list_events, list_feeds};
pub use webhooks::ingest_webhook;
