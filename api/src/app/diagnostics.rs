//! Diagnostics snapshot
//!
//! Effective configuration and loaded transformations, for operators.

use serde::Serialize;

use super::TransformRegistry;
use crate::config::Config;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub version: &'static str,
    pub database_url: String,
    pub max_items: u64,
    pub port: u16,
    pub base_url: String,
    pub feed_definitions: String,
    pub transforms_path: String,
    pub rate_limit: bool,
    /// Feed ids with a loaded transformation
    pub transforms: Vec<String>,
}

impl Diagnostics {
    pub fn collect(config: &Config, registry: &TransformRegistry) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            database_url: config.database_url.clone(),
            max_items: config.max_items,
            port: config.port,
            base_url: config.base_url.clone(),
            feed_definitions: config.feed_definitions.display().to_string(),
            transforms_path: registry
                .source_description()
                .unwrap_or_else(|| config.transforms.display().to_string()),
            rate_limit: config.rate_limit,
            transforms: registry.feed_ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RawItem;
    use crate::test_utils::{test_config, FixedTransform};
    use std::sync::Arc;

    #[test]
    fn reports_config_and_transforms() {
        let config = test_config();
        let registry = TransformRegistry::empty().with_transform(
            "ci",
            Arc::new(FixedTransform::new(vec![RawItem::new("t", "d", "l")])),
        );

        let diag = Diagnostics::collect(&config, &registry);
        assert_eq!(diag.max_items, config.max_items);
        assert_eq!(diag.transforms, vec!["ci".to_string()]);
        assert_eq!(diag.transforms_path, config.transforms.display().to_string());

        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
