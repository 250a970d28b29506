//! Atom renderer
//!
//! Pure projection of a feed record and its event window into an Atom
//! document. Events arrive already bounded and ordered newest first; the
//! renderer keeps that order as-is.

use atom_syndication::{Entry, Feed as AtomFeed, Link, Text};
use chrono::{DateTime, Utc};

use crate::domain::entities::{Event, Feed};

/// Public URL of a feed's Atom document, also used as its Atom id
pub fn feed_self_url(base_url: &str, feed_id: &str) -> String {
    format!("{}/{}.atom", base_url.trim_end_matches('/'), feed_id)
}

fn link(href: &str, rel: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel(rel);
    link
}

fn render_entry(event: &Event) -> Entry {
    let mut entry = Entry::default();
    entry.set_id(event.guid.as_str());
    entry.set_title(event.title.as_str());
    entry.set_links(vec![link(&event.link, "alternate")]);
    entry.set_updated(event.pub_date);
    entry.set_summary(Some(Text::plain(event.description.as_str())));
    entry
}

/// Render `events` of `feed` as an Atom document.
///
/// The feed's `updated` is the newest event's publication time, or `now`
/// when there are no events.
pub fn render_atom(feed: &Feed, events: &[Event], self_url: &str, now: DateTime<Utc>) -> String {
    let updated = events.first().map(|e| e.pub_date).unwrap_or(now);

    let mut links = vec![link(self_url, "self")];
    if !feed.url.is_empty() {
        links.push(link(&feed.url, "alternate"));
    }

    let mut atom = AtomFeed::default();
    atom.set_id(self_url);
    atom.set_title(feed.name.as_str());
    atom.set_links(links);
    atom.set_updated(updated);
    if !feed.icon_url.is_empty() {
        atom.set_icon(feed.icon_url.clone());
    }
    if !feed.description.is_empty() {
        atom.set_subtitle(Some(Text::plain(feed.description.as_str())));
    }
    atom.set_entries(events.iter().map(render_entry).collect::<Vec<_>>());

    atom.to_string()
}
