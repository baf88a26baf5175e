//! Core types and shared functionality for bizsync.
//!
//! This crate provides:
//! - Local store with SQLite backend
//! - Smart sync orchestration and change feed patching
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod sync;

pub use config::AppConfig;
pub use error::Error;
pub use model::{Business, Category, ChangeEvent, Dataset, EntityKind, LocalVersionRecord, VersionDescriptor};
pub use store::LocalStore;
pub use sync::{RemoteSource, SyncAction, SyncEngine, SyncOutcome};
