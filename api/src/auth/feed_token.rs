//! Per-feed token check for the webhook route
//!
//! A feed whose definition carries a non-empty `token` only accepts
//! webhooks presenting it, either as `Authorization: Bearer <token>` or as
//! a `?token=<token>` query parameter. Feeds without a token are open.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

fn tokens_match(expected: &str, presented: &str) -> bool {
    let (a, b) = (expected.as_bytes(), presented.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Whether a request carrying `headers` and `query_token` may post to a
/// feed requiring `required`
pub fn is_authorized(
    required: Option<&str>,
    headers: &HeaderMap,
    query_token: Option<&str>,
) -> bool {
    let Some(expected) = required else {
        return true;
    };
    bearer_token(headers)
        .into_iter()
        .chain(query_token)
        .any(|presented| tokens_match(expected, presented))
}

/// Rejects webhook requests without the feed's token
pub async fn feed_token_middleware(
    State(state): State<AppState>,
    Path(feed_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let definition = state.catalog.definition(&feed_id).await?;
    let required = definition.as_ref().and_then(|d| d.required_token());

    let query_token = params.get("token").map(String::as_str);
    if !is_authorized(required, request.headers(), query_token) {
        tracing::warn!(feed_id = %feed_id, "Rejected webhook without valid token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
