//! Storage contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the local key-value store contract used for snapshots.
//! - Isolate SQLite details from task-store orchestration.
//!
//! # Invariants
//! - Snapshot writes always replace the whole stored value.
//! - Snapshot reads never fail toward callers; bad data degrades to empty.

pub mod kv_store;
pub mod snapshot_repo;
