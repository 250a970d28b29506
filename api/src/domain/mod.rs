//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for feeds, events and transformation output
//! - `ports`: Trait definitions for storage, configuration and transformations

pub mod entities;
pub mod ports;
