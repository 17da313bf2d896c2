//! Core domain logic for Todolime.
//! This crate is the single source of truth for task-list invariants.

pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use identity::gate::{AuthState, IdentityError, IdentityGate, IdentityResult, UserIdentity};
pub use identity::local::LocalIdentityGate;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::{filter_tasks, FilterMode, FilterModeParseError, TaskCounts};
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use repo::snapshot_repo::{
    decode_snapshot, encode_snapshot, snapshot_key_for, DecodedSnapshot, KvSnapshotRepository,
    SnapshotRepository, TASKS_SNAPSHOT_KEY,
};
pub use service::task_store::{Clock, SystemClock, TaskStore};
pub use session::{select_view, AppSession, AppView, AuthMode};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
