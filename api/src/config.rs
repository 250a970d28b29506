use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/events.db?mode=rwc";
pub const DEFAULT_MAX_ITEMS: u64 = 50;
pub const DEFAULT_PORT: u16 = 8855;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Retention window per feed
    pub max_items: u64,
    pub port: u16,
    /// Public base URL used for feed self links
    pub base_url: String,
    /// YAML file with feed display metadata
    pub feed_definitions: PathBuf,
    /// YAML file with per-feed template transformations
    pub transforms: PathBuf,
    /// Rate limit the webhook route per client IP
    pub rate_limit: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or unparsable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_items =
            parse_or("HOOKFEED_MAX_ITEMS", lookup("HOOKFEED_MAX_ITEMS"), DEFAULT_MAX_ITEMS).max(1);
        let port = parse_or("HOOKFEED_PORT", lookup("HOOKFEED_PORT"), DEFAULT_PORT);

        Self {
            database_url: lookup("HOOKFEED_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_items,
            port,
            base_url: lookup("HOOKFEED_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
            feed_definitions: lookup("HOOKFEED_FEED_DEFINITIONS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/feeds.yaml")),
            transforms: lookup("HOOKFEED_TRANSFORMS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/transforms.yaml")),
            rate_limit: lookup("HOOKFEED_RATE_LIMIT")
                .map(|v| is_enabled(&v))
                .unwrap_or(true),
        }
    }

    /// Point the store at a SQLite file instead of the configured URL
    pub fn with_db_path(mut self, path: &std::path::Path) -> Self {
        self.database_url = format!("sqlite://{}?mode=rwc", path.display());
        self
    }
}

fn is_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using default {}", key, raw, default);
            default
        }),
    }
}
