//! SeaORM entities
//!
//! Table models for the two persisted tables. Domain code never sees these
//! directly; adapters convert them into `domain::entities` types.

pub mod events;
pub mod feeds;
