//! Feed definitions file
//!
//! ```yaml
//! builds:
//!   name: CI builds
//!   description: Pipeline results
//!   icon_url: https://ci.local/icon.png
//!   url: https://ci.local
//!   token: s3cret
//! ```
//!
//! The file is re-read on every load so edits apply without a restart.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ports::{FeedDefinitionSource, FeedDefinitions};
use crate::error::DomainError;

pub struct YamlFeedDefinitions {
    path: PathBuf,
}

impl YamlFeedDefinitions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a definitions document
pub fn parse_definitions(yaml: &str) -> Result<FeedDefinitions, DomainError> {
    if yaml.trim().is_empty() {
        return Ok(FeedDefinitions::new());
    }
    serde_yaml::from_str(yaml)
        .map_err(|e| DomainError::Configuration(format!("invalid feed definitions: {}", e)))
}

#[async_trait]
impl FeedDefinitionSource for YamlFeedDefinitions {
    async fn load(&self) -> Result<FeedDefinitions, DomainError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Configuration(format!(
                "cannot read feed definitions {}: {}",
                self.path.display(),
                e
            ))
        })?;
        parse_definitions(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
