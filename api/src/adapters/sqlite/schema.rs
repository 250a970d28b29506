//! Connection setup and schema bootstrap

use std::path::Path;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

const CREATE_FEEDS: &str = r#"
CREATE TABLE IF NOT EXISTS feeds (
    feed_id TEXT PRIMARY KEY NOT NULL,
    feed_name TEXT NOT NULL,
    feed_description TEXT NOT NULL,
    feed_icon_url TEXT NOT NULL,
    feed_created_at TEXT NOT NULL,
    feed_url TEXT NOT NULL,
    feed_token TEXT
)"#;

const CREATE_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_id TEXT NOT NULL,
    event_title TEXT NOT NULL,
    event_description TEXT NOT NULL,
    event_link TEXT NOT NULL,
    event_guid TEXT NOT NULL,
    event_pub_date TEXT NOT NULL,
    raw_msg TEXT NOT NULL,
    msg_hash TEXT NOT NULL,
    is_test INTEGER NOT NULL DEFAULT 0
)"#;

// Serves both the per-feed listing and the retention prune.
const CREATE_EVENTS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_events_feed_pub_date
    ON events (feed_id, event_pub_date, event_id)"#;

/// Open a SeaORM connection to `url`.
///
/// In-memory databases are pinned to a single pooled connection, otherwise
/// every pooled connection would see its own empty database.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    if let Some(parent) = sqlite_file_parent(url) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbErr::Custom(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    let mut opts = ConnectOptions::new(url.to_owned());
    opts.sqlx_logging(false);
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }

    Database::connect(opts).await
}

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    for ddl in [CREATE_FEEDS, CREATE_EVENTS, CREATE_EVENTS_INDEX] {
        db.execute_unprepared(ddl).await?;
    }
    tracing::info!("Database schema initialized");
    Ok(())
}

/// Directory holding the database file of a `sqlite://` URL, if any
fn sqlite_file_parent(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path).parent()
}
