//! Webhook handlers
//!
//! Inbound webhook payloads are turned into feed events here.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::EventId;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub feed_id: String,
    pub title: Vec<String>,
    pub event_ids: Vec<EventId>,
}

/// Parse the request body, which must be a JSON object.
///
/// Returns the parsed payload together with the body text.
fn parse_payload(body: &[u8]) -> Result<(Value, &str), AppError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| AppError::Parse(format!("body is not UTF-8: {}", e)))?;
    let payload: Value = serde_json::from_str(text)
        .map_err(|e| AppError::Parse(format!("invalid JSON body: {}", e)))?;
    if !payload.is_object() {
        return Err(AppError::Parse(
            "webhook body must be a JSON object".to_string(),
        ));
    }
    Ok((payload, text))
}

/// POST /webhook/:feed_id
pub async fn ingest_webhook(
    State(state): State<AppState>,
    Path(feed_id): Path<String>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let (payload, raw_msg) = parse_payload(&body).map_err(|e| {
        tracing::warn!(
            feed_id = %feed_id,
            error = %e,
            body = %String::from_utf8_lossy(&body),
            "Rejected webhook body"
        );
        e
    })?;

    match state.ingest_service.ingest(&feed_id, &payload, raw_msg).await {
        Ok(outcome) => Ok(Json(WebhookResponse {
            status: "ok",
            feed_id: outcome.feed_id,
            title: outcome.titles,
            event_ids: outcome.event_ids,
        })),
        Err(e) => {
            tracing::warn!(
                feed_id = %feed_id,
                error = %e,
                payload = %payload,
                "Webhook ingestion failed"
            );
            Err(AppError::from_ingest(e))
        }
    }
}
