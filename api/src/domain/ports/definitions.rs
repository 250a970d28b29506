//! Feed definition port
//!
//! Feed display metadata and access tokens are declared outside the store
//! by the operator. The catalog reads them through this trait at
//! reconciliation time.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::entities::FeedDefinition;
use crate::error::DomainError;

/// Declared feeds keyed by feed id
pub type FeedDefinitions = BTreeMap<String, FeedDefinition>;

#[async_trait]
pub trait FeedDefinitionSource: Send + Sync {
    /// Load the current set of declared feeds
    async fn load(&self) -> Result<FeedDefinitions, DomainError>;

    /// Where the definitions come from, for diagnostics
    fn describe(&self) -> String;
}
