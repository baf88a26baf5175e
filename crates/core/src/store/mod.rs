//! SQLite-backed local store for cached entity collections.
//!
//! A key/value table holds one serialized array per entity collection and one
//! entry for the local version record. Access is async via tokio-rusqlite;
//! every operation completes before the awaiting caller continues, so there is
//! no window in which a later read misses an earlier write.
//!
//! - Automatic schema migrations
//! - Fail-closed decoding: incompatible shapes read as absent
//! - Transactional multi-key writes for full syncs

pub mod collections;
pub mod connection;
mod kv;
pub mod migrations;
pub mod version;

pub use crate::Error;

pub use connection::LocalStore;
