//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod definitions;
pub mod repositories;
pub mod transform;

pub use definitions::{FeedDefinitionSource, FeedDefinitions};
pub use repositories::{EventRepository, FeedRepository};
pub use transform::{Transform, TransformSource, TransformTable};
