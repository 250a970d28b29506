//! Transformation registry
//!
//! Holds exactly one transformation per feed id. The table is loaded from an
//! operator-supplied source and can be swapped at runtime without blocking
//! in-flight ingestion: readers clone an `Arc` of the current table.

use std::sync::{Arc, RwLock};

use crate::domain::ports::{Transform, TransformSource, TransformTable};
use crate::error::DomainError;

pub struct TransformRegistry {
    table: RwLock<Arc<TransformTable>>,
    source: Option<Box<dyn TransformSource>>,
}

impl TransformRegistry {
    /// A registry with no transformations and no source to reload from
    pub fn empty() -> Self {
        Self {
            table: RwLock::new(Arc::new(TransformTable::new())),
            source: None,
        }
    }

    /// A registry backed by `source` with nothing loaded yet; call
    /// [`reload`](Self::reload) to populate it
    pub fn unloaded(source: Box<dyn TransformSource>) -> Self {
        Self {
            table: RwLock::new(Arc::new(TransformTable::new())),
            source: Some(source),
        }
    }

    /// Load the initial table from `source`
    pub fn from_source(source: Box<dyn TransformSource>) -> Result<Self, DomainError> {
        let table = source.load()?;
        tracing::info!(
            source = %source.describe(),
            transforms = ?transform_names(&table),
            "Loaded transformations"
        );

        Ok(Self {
            table: RwLock::new(Arc::new(table)),
            source: Some(source),
        })
    }

    /// Builder-style registration, mostly for embedding and tests
    pub fn with_transform(self, feed_id: &str, transform: Arc<dyn Transform>) -> Self {
        self.register(feed_id, transform);
        self
    }

    /// Add or replace the transformation for one feed id
    pub fn register(&self, feed_id: &str, transform: Arc<dyn Transform>) {
        let mut guard = self.table.write().unwrap_or_else(|p| p.into_inner());
        let mut table = TransformTable::clone(&guard);
        tracing::info!(
            feed_id = %feed_id,
            transform = %transform.name(),
            "Registered transformation"
        );
        table.insert(feed_id.to_string(), transform);
        *guard = Arc::new(table);
    }

    /// The transformation registered for `feed_id`
    pub fn resolve(&self, feed_id: &str) -> Result<Arc<dyn Transform>, DomainError> {
        self.snapshot().get(feed_id).cloned().ok_or_else(|| {
            DomainError::Configuration(format!(
                "No transformation registered for feed '{}'",
                feed_id
            ))
        })
    }

    /// Re-read the source and atomically replace the table.
    ///
    /// On failure the current table stays in place.
    pub fn reload(&self) -> Result<usize, DomainError> {
        let Some(source) = &self.source else {
            return Err(DomainError::Configuration(
                "transformation registry has no source to reload from".to_string(),
            ));
        };

        let table = source.load()?;
        let count = table.len();
        tracing::info!(
            source = %source.describe(),
            transforms = ?transform_names(&table),
            "Reloaded transformations"
        );

        *self.table.write().unwrap_or_else(|p| p.into_inner()) = Arc::new(table);
        Ok(count)
    }

    /// Feed ids with a registered transformation
    pub fn feed_ids(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// Where the table was loaded from, if anywhere
    pub fn source_description(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.describe())
    }

    fn snapshot(&self) -> Arc<TransformTable> {
        self.table.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

fn transform_names(table: &TransformTable) -> Vec<String> {
    table
        .iter()
        .map(|(feed_id, t)| format!("{} ({})", feed_id, t.name()))
        .collect()
}
