//! Domain types shared by the store, the sync engine, and the remote client.

pub mod dataset;
pub mod entity;
pub mod event;
pub mod version;

pub use dataset::Dataset;
pub use entity::{Business, Category, Entity, EntityKind};
pub use event::{ChangeEvent, EntityRecord, Operation};
pub use version::{LocalVersionRecord, VersionDescriptor};
