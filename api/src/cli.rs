//! Command-line surface
//!
//! Flags may be combined; maintenance commands run in a fixed order before
//! `--run` starts the server.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::Diagnostics;
use crate::domain::ports::EventRepository;
use crate::AppState;

/// Turn inbound webhooks into Atom feeds
#[derive(Debug, Parser)]
#[clap(name = "hookfeed", version, about)]
pub struct Cli {
    /// Re-sync every feed record from the definitions file
    #[clap(long)]
    pub update_all: bool,

    /// Re-sync one feed record from the definitions file
    #[clap(long, value_name = "FEED_ID")]
    pub update_feed: Option<String>,

    /// List feeds with their event counts
    #[clap(long)]
    pub show_feeds: bool,

    /// List the retained events of a feed
    #[clap(long, value_name = "FEED_ID")]
    pub show_events: Option<String>,

    /// Print the effective configuration and loaded transformations
    #[clap(long)]
    pub show_diagnostics: bool,

    /// SQLite database file, overriding HOOKFEED_DATABASE_URL
    #[clap(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Serve HTTP
    #[clap(long)]
    pub run: bool,
}

impl Cli {
    /// Whether any action was requested; `--db-path` alone is not one
    pub fn has_action(&self) -> bool {
        self.update_all
            || self.update_feed.is_some()
            || self.show_feeds
            || self.show_events.is_some()
            || self.show_diagnostics
            || self.run
    }
}

/// Run every requested maintenance command except `--run`
pub async fn run_commands(cli: &Cli, state: &AppState) -> Result<()> {
    if cli.update_all {
        let synced = state.catalog.sync(None).await?;
        println!("Updated {} feed(s): {}", synced.len(), synced.join(", "));
    }

    if let Some(feed_id) = &cli.update_feed {
        state.catalog.sync(Some(feed_id)).await?;
        println!("Updated feed {}", feed_id);
    }

    if cli.show_feeds {
        let feeds = state
            .catalog
            .resolve_all_with_counts(state.events.as_ref())
            .await?;
        if feeds.is_empty() {
            println!("No feeds defined");
        }
        for entry in feeds {
            println!(
                "{:<24} {:>5} events  {}",
                entry.feed.feed_id, entry.count, entry.feed.name
            );
        }
    }

    if let Some(feed_id) = &cli.show_events {
        let feed = state.catalog.resolve(feed_id).await?;
        let events = state.events.list(&feed.feed_id).await?;
        println!("{} ({} events)", feed.name, events.len());
        for event in events {
            println!(
                "#{:<6} {}  {}{}\n        {}",
                event.id.0,
                event.pub_date.to_rfc3339(),
                event.title,
                if event.is_test { " [test]" } else { "" },
                event.link
            );
        }
    }

    if cli.show_diagnostics {
        let diagnostics = Diagnostics::collect(&state.config, &state.registry);
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        println!("feed definitions: {}", state.catalog.definitions_source());
    }

    Ok(())
}
