//! Raw key/value access used inside `Connection::call` closures.
//!
//! Decoding is fail-closed: a value that does not parse into the expected
//! shape is reported as absent, never as an error.

use crate::Error;
use crate::model::Entity;
use serde::{Serialize, de::DeserializeOwned};
use tokio_rusqlite::{params, rusqlite};

/// Key of the local version record.
pub(crate) const VERSION_KEY: &str = "data_version";

pub(crate) fn read(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>, Error> {
    let result = conn.query_row("SELECT value FROM kv_entries WHERE key = ?1", params![key], |row| row.get(0));

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn write(conn: &rusqlite::Connection, key: &str, value: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, written_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            written_at = excluded.written_at",
        params![key, value, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub(crate) fn remove(conn: &rusqlite::Connection, key: &str) -> Result<u64, Error> {
    let count = conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
    Ok(count as u64)
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|e| Error::Encode(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding undecodable cache entry");
            None
        }
    }
}

/// Decode a serialized collection, rejecting it whole if any record is invalid.
pub(crate) fn decode_collection<E: Entity>(raw: &str) -> Option<Vec<E>> {
    let key = E::KIND.storage_key();
    let items: Vec<E> = decode(key, raw)?;
    if let Some(bad) = items.iter().find(|e| !e.is_valid()) {
        tracing::warn!(key, id = bad.id(), "discarding cached collection with invalid record");
        return None;
    }
    Some(items)
}

/// Read a collection for an in-place patch.
///
/// An undecodable collection is replaced by an empty one and the version
/// record is dropped with it, so the next sync is a cold start instead of
/// trusting a patched fragment.
pub(crate) fn load_for_patch<E: Entity>(conn: &rusqlite::Connection) -> Result<Vec<E>, Error> {
    let key = E::KIND.storage_key();
    match read(conn, key)? {
        None => Ok(Vec::new()),
        Some(raw) => match decode_collection::<E>(&raw) {
            Some(items) => Ok(items),
            None => {
                remove(conn, VERSION_KEY)?;
                Ok(Vec::new())
            }
        },
    }
}
