//! Transformation port
//!
//! A transformation turns one inbound webhook payload for a feed into zero
//! or more raw feed items. Each feed id has at most one transformation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::RawItem;
use crate::error::DomainError;

pub trait Transform: Send + Sync {
    /// Name shown in logs and diagnostics
    fn name(&self) -> &str;

    /// Map a payload to raw items.
    ///
    /// Transformations are expected to default missing source fields
    /// themselves; an `Err` here aborts the ingestion call.
    fn transform(&self, payload: &Value, feed_id: &str) -> Result<Vec<RawItem>, DomainError>;
}

/// Transformations keyed by the feed id they serve
pub type TransformTable = BTreeMap<String, Arc<dyn Transform>>;

/// Operator-supplied origin of the transformation table
pub trait TransformSource: Send + Sync {
    /// Build a fresh table from the source
    fn load(&self) -> Result<TransformTable, DomainError>;

    /// Where the transformations come from, for diagnostics
    fn describe(&self) -> String;
}
