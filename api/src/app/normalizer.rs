//! Item normalizer
//!
//! Turns raw transformation output into persistable events. The normalizer
//! is independent of which transformation produced the items: it stamps
//! identity (publication time, GUID), provenance (raw payload, structural
//! fingerprint) and the test flag.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::entities::{format_pub_date, NewEvent, RawItem};
use crate::error::DomainError;

/// Hex characters kept from a SHA-256 digest for GUIDs and fingerprints
pub const HASH_LEN: usize = 24;

fn short_hash(input: &[u8]) -> String {
    let mut hex = hex::encode(Sha256::digest(input));
    hex.truncate(HASH_LEN);
    hex
}

/// GUID for an item published at `pub_date` (stored text form) with `title`
pub fn make_guid(pub_date: &str, title: &str) -> String {
    short_hash(format!("{}-{}", pub_date, title).as_bytes())
}

/// Key-nesting skeleton of a JSON value.
///
/// Serializes as the value with every scalar and every list replaced by an
/// empty string, objects keyed in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Object(BTreeMap<String, Shape>),
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                Shape::Object(map.iter().map(|(k, v)| (k.clone(), Shape::of(v))).collect())
            }
            _ => Shape::Leaf,
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Shape::Leaf => serializer.serialize_str(""),
            Shape::Object(map) => serializer.collect_map(map),
        }
    }
}

/// Escape every character from DEL upwards as `\uXXXX` (UTF-16 units), so
/// non-ASCII keys hash the same as an ASCII-only JSON encoder would emit.
fn ascii_escaped(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if (c as u32) < 0x7f {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

/// Structural fingerprint of a payload: hash of its canonical skeleton
pub fn structure_hash(payload: &Value) -> Result<String, DomainError> {
    let skeleton = serde_json::to_string(&Shape::of(payload)).map_err(|e| {
        DomainError::Normalization(format!("cannot serialize payload shape: {}", e))
    })?;
    Ok(short_hash(ascii_escaped(&skeleton).as_bytes()))
}

/// Read the optional `test` flag of a payload
pub fn is_test_payload(payload: &Value) -> bool {
    match payload.get("test") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    }
}

fn required(
    field: Option<String>,
    name: &str,
    index: usize,
    feed_id: &str,
) -> Result<String, DomainError> {
    field.ok_or_else(|| {
        DomainError::Normalization(format!(
            "item {} for feed '{}' is missing required field '{}'",
            index, feed_id, name
        ))
    })
}

/// Normalize items produced from `payload`, stamped with the current time.
///
/// `raw_msg` is the payload text as received and is archived unchanged.
pub fn normalize(
    feed_id: &str,
    payload: &Value,
    raw_msg: &str,
    items: Vec<RawItem>,
) -> Result<Vec<NewEvent>, DomainError> {
    normalize_at(feed_id, payload, raw_msg, items, Utc::now())
}

/// Normalize items with an explicit ingestion time.
///
/// Every item of one call shares `now` as its publication time. Any item
/// missing a field fails the whole call.
pub fn normalize_at(
    feed_id: &str,
    payload: &Value,
    raw_msg: &str,
    items: Vec<RawItem>,
    now: DateTime<Utc>,
) -> Result<Vec<NewEvent>, DomainError> {
    // GUIDs hash the stored text form so they can be recomputed from a row.
    let pub_date_text = format_pub_date(&now);
    let is_test = is_test_payload(payload);
    let msg_hash = structure_hash(payload)?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let title = required(item.title, "title", index, feed_id)?;
            let description = required(item.description, "description", index, feed_id)?;
            let link = required(item.link, "link", index, feed_id)?;

            Ok::<_, DomainError>(NewEvent {
                feed_id: feed_id.to_string(),
                guid: make_guid(&pub_date_text, &title),
                title,
                description,
                link,
                pub_date: now,
                raw_msg: raw_msg.to_string(),
                msg_hash: msg_hash.clone(),
                is_test,
            })
        })
        .collect()
}
