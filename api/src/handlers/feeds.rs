//! Feed handlers
//!
//! Atom documents for feed readers plus JSON listings of feeds and events.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::entities::{Event, FeedWithCount};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use crate::AppState;

const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";

/// GET /:feed_file
///
/// Only `<feed_id>.atom` names are served.
pub async fn get_atom(
    State(state): State<AppState>,
    Path(feed_file): Path<String>,
) -> Result<Response, AppError> {
    let feed_id = feed_file
        .strip_suffix(".atom")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::NotFound(feed_file.clone()))?;

    let xml = state.syndication_service.atom(feed_id).await?;

    Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], xml).into_response())
}

/// GET /feeds
pub async fn list_feeds(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedWithCount>>, AppError> {
    let feeds = state
        .catalog
        .resolve_all_with_counts(state.events.as_ref())
        .await?;
    Ok(Json(feeds))
}

#[derive(Serialize)]
pub struct EventListResponse {
    pub feed_id: String,
    pub count: usize,
    pub events: Vec<Event>,
}

/// GET /feeds/:feed_id
pub async fn list_events(
    State(state): State<AppState>,
    Path(feed_id): Path<String>,
) -> Result<Json<EventListResponse>, AppError> {
    let feed = state.catalog.resolve(&feed_id).await?;
    let events = state.events.list(&feed.feed_id).await?;

    Ok(Json(EventListResponse {
        feed_id: feed.feed_id,
        count: events.len(),
        events,
    }))
}
