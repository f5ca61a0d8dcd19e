//! Cluster id resolution.
//!
//! # Flow
//! ```text
//! store opened? ── no ──▶ None (server picks its own id)
//!      │ yes
//!      ▼
//! read(env, key) ── non-empty ──▶ Some(id)
//!      │ empty / error
//!      ▼
//! generate UUID v4 → write back (errors ignored) → Some(id)
//! ```
//!
//! Nothing here is fatal: a missing identity only degrades to the server default.

use uuid::Uuid;

use crate::identity::store::{PropertyStore, StoreError};

/// Read the persisted cluster id, creating one if the store has none.
pub fn resolve_cluster_id<S: PropertyStore>(
    opened: Result<S, StoreError>,
    env: &str,
    key: &str,
) -> Option<String> {
    let store = match opened {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "Cluster identity store unavailable, using server default");
            return None;
        }
    };

    match store.read(env, key) {
        Ok(Some(id)) if !id.is_empty() => {
            tracing::debug!(cluster_id = %id, "Using persisted cluster id");
            return Some(id);
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, env, key, "Failed to read cluster id, generating a new one");
        }
    }

    let id = Uuid::new_v4().to_string();
    if let Err(e) = store.write(env, key, &id) {
        tracing::warn!(error = %e, env, key, "Failed to persist generated cluster id");
    }
    tracing::info!(cluster_id = %id, "Generated new cluster id");
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::store::{FileStore, MemoryStore};

    #[test]
    fn generates_and_persists_on_fresh_store() {
        let store = MemoryStore::new();

        let first = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id").unwrap();
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(store.writes(), 1);

        let second = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn existing_value_is_returned_without_write() {
        let store = MemoryStore::new().with_value("default", "cluster-id", "X");

        let id = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id");
        assert_eq!(id.as_deref(), Some("X"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn empty_value_is_replaced() {
        let store = MemoryStore::new().with_value("default", "cluster-id", "");

        let id = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id").unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.get("default", "cluster-id"), Some(id));
    }

    #[test]
    fn read_failure_falls_back_to_generation() {
        let store = MemoryStore::new().failing_reads();

        let id = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id");
        assert!(id.is_some());
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn write_failure_still_yields_id() {
        let store = MemoryStore::new().failing_writes();

        let id = resolve_cluster_id(Ok(store.clone()), "default", "cluster-id");
        assert!(id.is_some());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn unopenable_store_yields_none() {
        let opened: Result<MemoryStore, StoreError> = Err(StoreError::NoConfigDir);
        assert_eq!(resolve_cluster_id(opened, "default", "cluster-id"), None);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let first = resolve_cluster_id(
            FileStore::open_in(dir.path(), "temporalio", "version-info"),
            "default",
            "cluster-id",
        );
        let second = resolve_cluster_id(
            FileStore::open_in(dir.path(), "temporalio", "version-info"),
            "default",
            "cluster-id",
        );

        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
