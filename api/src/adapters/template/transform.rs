//! Template transformations and their YAML source

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::Template;
use crate::domain::entities::RawItem;
use crate::domain::ports::{Transform, TransformSource, TransformTable};
use crate::error::DomainError;

/// One feed's entry in the transformations file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    /// JSON pointer to an array; each element becomes one item
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A transformation built from string templates
#[derive(Debug)]
pub struct TemplateTransform {
    name: String,
    items: Option<String>,
    title: Option<Template>,
    description: Option<Template>,
    link: Option<Template>,
}

fn parse_optional(template: Option<&str>) -> Result<Option<Template>, DomainError> {
    template.map(Template::parse).transpose()
}

impl TemplateTransform {
    pub fn from_spec(feed_id: &str, spec: &TemplateSpec) -> Result<Self, DomainError> {
        if let Some(items) = &spec.items {
            if !items.is_empty() && !items.starts_with('/') {
                return Err(DomainError::Configuration(format!(
                    "feed '{}': items must be a JSON pointer, got '{}'",
                    feed_id, items
                )));
            }
        }

        Ok(Self {
            name: format!("template:{}", feed_id),
            items: spec.items.clone(),
            title: parse_optional(spec.title.as_deref())?,
            description: parse_optional(spec.description.as_deref())?,
            link: parse_optional(spec.link.as_deref())?,
        })
    }

    fn scopes<'a>(
        &self,
        payload: &'a Value,
        feed_id: &str,
    ) -> Result<Vec<&'a Value>, DomainError> {
        let Some(pointer) = &self.items else {
            return Ok(vec![payload]);
        };

        match payload.pointer(pointer) {
            Some(Value::Array(elements)) => Ok(elements.iter().collect()),
            Some(_) => Err(DomainError::Transform(format!(
                "'{}' in payload for feed '{}' is not a list",
                pointer, feed_id
            ))),
            None => Err(DomainError::Transform(format!(
                "payload for feed '{}' has no '{}' list",
                feed_id, pointer
            ))),
        }
    }
}

impl Transform for TemplateTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, payload: &Value, feed_id: &str) -> Result<Vec<RawItem>, DomainError> {
        let render = |template: &Option<Template>, scope: &Value| {
            template
                .as_ref()
                .map(|t| t.render(scope, payload, feed_id))
                .transpose()
        };

        self.scopes(payload, feed_id)?
            .into_iter()
            .map(|scope| {
                Ok::<_, DomainError>(RawItem {
                    title: render(&self.title, scope)?,
                    description: render(&self.description, scope)?,
                    link: render(&self.link, scope)?,
                })
            })
            .collect()
    }
}

/// Parse a transformations document into a table
pub fn parse_transforms(yaml: &str) -> Result<TransformTable, DomainError> {
    let specs: BTreeMap<String, TemplateSpec> = serde_yaml::from_str(yaml)
        .map_err(|e| DomainError::Configuration(format!("invalid transformations: {}", e)))?;

    specs
        .iter()
        .map(|(feed_id, spec)| {
            let transform = TemplateTransform::from_spec(feed_id, spec)?;
            Ok::<_, DomainError>((feed_id.clone(), Arc::new(transform) as Arc<dyn Transform>))
        })
        .collect()
}

/// Transformations file on disk
pub struct YamlTransformSource {
    path: PathBuf,
}

impl YamlTransformSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransformSource for YamlTransformSource {
    fn load(&self) -> Result<TransformTable, DomainError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DomainError::Configuration(format!(
                "cannot read transformations {}: {}",
                self.path.display(),
                e
            ))
        })?;
        // An empty file is an empty table rather than a YAML error.
        if content.trim().is_empty() {
            return Ok(TransformTable::new());
        }
        parse_transforms(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
