//! Feed module
//!
//! Syndication rendering of a feed's retained events.

pub mod renderer;

pub use renderer::{feed_self_url, render_atom};
