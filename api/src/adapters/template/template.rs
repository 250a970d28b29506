//! String templates with payload placeholders
//!
//! Syntax: literal text with `{{ expr }}` or `{{ expr | default }}` holes.
//! `expr` is one of:
//! - `/json/pointer` resolved against the current item scope
//! - `$/json/pointer` (or `$` alone) resolved against the whole payload
//! - `feed_id`

use regex::Regex;
use serde_json::Value;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    FeedId,
    Scope(String),
    Root(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        lookup: Lookup,
        default: Option<String>,
    },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn parse_lookup(expr: &str, template: &str) -> Result<Lookup, DomainError> {
    if expr == "feed_id" {
        return Ok(Lookup::FeedId);
    }
    if let Some(pointer) = expr.strip_prefix('$') {
        if pointer.is_empty() || pointer.starts_with('/') {
            return Ok(Lookup::Root(pointer.to_string()));
        }
    } else if expr.starts_with('/') {
        return Ok(Lookup::Scope(expr.to_string()));
    }

    Err(DomainError::Configuration(format!(
        "invalid placeholder '{}' in template '{}'",
        expr, template
    )))
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        let re = Regex::new(r"\{\{(.*?)\}\}")
            .map_err(|e| DomainError::Configuration(format!("placeholder pattern: {}", e)))?;

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in re.captures_iter(source) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }

            let (expr, default) = match inner.as_str().split_once('|') {
                Some((expr, default)) => (expr.trim(), Some(default.trim().to_string())),
                None => (inner.as_str().trim(), None),
            };
            segments.push(Segment::Field {
                lookup: parse_lookup(expr, source)?,
                default,
            });
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Render against one item scope of `payload`
    pub fn render(
        &self,
        scope: &Value,
        payload: &Value,
        feed_id: &str,
    ) -> Result<String, DomainError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { lookup, default } => {
                    let found = match lookup {
                        Lookup::FeedId => {
                            out.push_str(feed_id);
                            continue;
                        }
                        Lookup::Scope(pointer) => scope.pointer(pointer),
                        Lookup::Root(pointer) => payload.pointer(pointer),
                    };

                    match (found, default) {
                        (Some(Value::String(s)), _) => out.push_str(s),
                        (Some(value), _) if !value.is_null() => out.push_str(&value.to_string()),
                        (_, Some(default)) => out.push_str(default),
                        _ => {
                            return Err(DomainError::Transform(format!(
                                "payload for feed '{}' has no value for '{}' required by template '{}'",
                                feed_id,
                                lookup_text(lookup),
                                self.source
                            )))
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

fn lookup_text(lookup: &Lookup) -> String {
    match lookup {
        Lookup::FeedId => "feed_id".to_string(),
        Lookup::Scope(p) => p.clone(),
        Lookup::Root(p) => format!("${}", p),
    }
}
