//! Feed domain entity
//!
//! A feed is a named, bounded stream of events exposed as an Atom document.
//! Feed records are reconciled from operator-supplied definitions and are
//! never deleted by the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted feed record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub feed_id: String,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Access token for the webhook route, never rendered in listings
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

/// A feed together with the number of events it currently retains
#[derive(Debug, Clone, Serialize)]
pub struct FeedWithCount {
    #[serde(flatten)]
    pub feed: Feed,
    pub count: u64,
}

/// Display metadata for one feed as declared in the definitions file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl FeedDefinition {
    /// The configured token, if one is set and non-empty
    pub fn required_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Data needed to write a feed record
#[derive(Debug, Clone)]
pub struct NewFeed {
    pub feed_id: String,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub token: Option<String>,
}

impl NewFeed {
    /// Build a feed record from its definition, stamped with `created_at`
    pub fn from_definition(
        feed_id: &str,
        definition: &FeedDefinition,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            icon_url: definition.icon_url.clone(),
            url: definition.url.clone(),
            created_at,
            token: definition.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_parses_with_optional_fields_missing() {
        let yaml = "name: Builds\n";
        let def: FeedDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.name, "Builds");
        assert!(def.description.is_empty());
        assert!(def.token.is_none());
    }

    #[test]
    fn empty_token_is_not_required() {
        let def = FeedDefinition {
            name: "n".to_string(),
            description: String::new(),
            icon_url: String::new(),
            url: String::new(),
            token: Some(String::new()),
        };
        assert_eq!(def.required_token(), None);

        let def = FeedDefinition {
            token: Some("s3cret".to_string()),
            ..def
        };
        assert_eq!(def.required_token(), Some("s3cret"));
    }

    #[test]
    fn token_is_not_serialized() {
        let feed = Feed {
            feed_id: "ci".to_string(),
            name: "CI".to_string(),
            description: "builds".to_string(),
            icon_url: String::new(),
            url: "http://ci.local".to_string(),
            created_at: Utc::now(),
            token: Some("hidden".to_string()),
        };
        let json = serde_json::to_value(FeedWithCount { feed, count: 3 }).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["feed_id"], "ci");
        assert_eq!(json["count"], 3);
    }
}
