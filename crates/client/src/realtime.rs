//! Realtime change payload decoding.
//!
//! The push channel delivers one JSON object per committed write:
//!
//! ```json
//! { "eventType": "UPDATE", "table": "businesses", "new": { ... }, "old": { "id": "b1" } }
//! ```
//!
//! Inserts and updates must carry a full row in `new`; deletes must carry at
//! least the primary key in `old`. Empty objects count as missing.

use serde::Deserialize;

use crate::rest::rows::{BusinessRow, CategoryRow, KeyRow};
use bizsync_core::{Business, Category, ChangeEvent, EntityKind, Error};
use bizsync_core::model::{Entity, EntityRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RealtimeEventType {
    Insert,
    Update,
    Delete,
}

/// Raw realtime payload as delivered by the push channel.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimePayload {
    #[serde(rename = "eventType")]
    pub event_type: RealtimeEventType,
    pub table: String,
    #[serde(default)]
    pub new: Option<serde_json::Value>,
    #[serde(default)]
    pub old: Option<serde_json::Value>,
}

impl TryFrom<RealtimePayload> for ChangeEvent {
    type Error = Error;

    fn try_from(payload: RealtimePayload) -> Result<Self, Self::Error> {
        let kind: EntityKind = payload.table.parse().map_err(Error::Decode)?;

        match payload.event_type {
            RealtimeEventType::Insert => Ok(ChangeEvent::Insert(record(kind, payload.new)?)),
            RealtimeEventType::Update => Ok(ChangeEvent::Update(record(kind, payload.new)?)),
            RealtimeEventType::Delete => {
                let old = present(payload.old)
                    .ok_or_else(|| Error::Decode(format!("DELETE on {} without old record", payload.table)))?;
                let key: KeyRow =
                    serde_json::from_value(old).map_err(|e| Error::Decode(format!("old record: {e}")))?;
                Ok(ChangeEvent::delete(kind, key.id.into_string()))
            }
        }
    }
}

fn present(value: Option<serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

fn record(kind: EntityKind, new: Option<serde_json::Value>) -> Result<EntityRecord, Error> {
    let new = present(new).ok_or_else(|| Error::Decode(format!("{kind} event without new record")))?;

    let record = match kind {
        EntityKind::Business => {
            let row: BusinessRow =
                serde_json::from_value(new).map_err(|e| Error::Decode(format!("business record: {e}")))?;
            EntityRecord::Business(Business::from(row))
        }
        EntityKind::Category => {
            let row: CategoryRow =
                serde_json::from_value(new).map_err(|e| Error::Decode(format!("category record: {e}")))?;
            EntityRecord::Category(Category::from(row))
        }
    };

    let valid = match &record {
        EntityRecord::Business(b) => b.is_valid(),
        EntityRecord::Category(c) => c.is_valid(),
    };
    if !valid {
        return Err(Error::Decode(format!("{kind} record {:?} is incomplete", record.id())));
    }

    Ok(record)
}

/// Decode a raw realtime payload into a change event.
///
/// # Errors
///
/// Returns `Error::Decode` for malformed JSON, unknown tables, missing records,
/// or records without an id (or a business without a shop name).
pub fn decode_payload(raw: &str) -> Result<ChangeEvent, Error> {
    let payload: RealtimePayload = serde_json::from_str(raw).map_err(|e| Error::Decode(e.to_string()))?;
    ChangeEvent::try_from(payload)
}
