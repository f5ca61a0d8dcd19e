//! Cluster identity subsystem.
//!
//! A cluster id distinguishes one local installation from another across
//! restarts. It lives in a user-scoped property store and is created on
//! first run.

pub mod cluster;
pub mod store;

pub use cluster::resolve_cluster_id;
pub use store::{FileStore, MemoryStore, PropertyStore, StoreError};
