//! Client code for bizsync.
//!
//! This crate provides the HTTP remote data source and decoding of pushed
//! realtime change payloads, shared by the server and any embedding app.

pub mod realtime;
pub mod rest;

pub use realtime::{RealtimeEventType, RealtimePayload, decode_payload};
pub use rest::{RemoteError, RestConfig, RestSource};
