//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and clearing the local store.

pub mod info;
pub mod purge;

pub use info::{CacheInfoOutput, info_impl};
pub use purge::{CachePurgeOutput, purge_impl};
