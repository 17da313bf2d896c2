//! Task snapshot persistence over a key-value store.
//!
//! # Responsibility
//! - Serialize the full task sequence under one storage key.
//! - Hydrate a task sequence from that key, discarding unusable data.
//!
//! # Invariants
//! - `load` never returns an error; absent, unreadable or unparseable data
//!   yields an empty sequence.
//! - Records are discarded individually: one bad record does not drop its
//!   siblings. Duplicate ids keep the first occurrence.
//! - `save` always writes the whole sequence.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_store::{KeyValueStore, RepoResult};
use log::{debug, warn};
use std::collections::HashSet;

/// Storage key shared with snapshots written by earlier app versions.
pub const TASKS_SNAPSHOT_KEY: &str = "todolime-tasks";

/// Returns the snapshot key for an optional signed-in user.
///
/// Signed-out sessions use the unscoped legacy key.
pub fn snapshot_key_for(user_id: Option<&str>) -> String {
    match user_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{TASKS_SNAPSHOT_KEY}:{id}"),
        None => TASKS_SNAPSHOT_KEY.to_string(),
    }
}

/// Persistence contract consumed by `TaskStore`.
pub trait SnapshotRepository {
    /// Reads the stored snapshot; degrades to empty on any failure.
    fn load(&self) -> Vec<Task>;
    /// Overwrites the stored snapshot with `tasks`.
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// Outcome of decoding a raw snapshot blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub tasks: Vec<Task>,
    /// Records dropped by the discard policy.
    pub discarded: usize,
}

/// Decodes a raw snapshot.
///
/// Returns `None` when `raw` is not a JSON array at all.
pub fn decode_snapshot(raw: &str) -> Option<DecodedSnapshot> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "event=snapshot_decode module=repo status=error error_code=snapshot_unparseable error={}",
                err
            );
            return None;
        }
    };

    let mut decoded = DecodedSnapshot::default();
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<Task>(record) {
            Ok(task) if seen.insert(task.id) => decoded.tasks.push(task),
            Ok(task) => {
                debug!(
                    "event=snapshot_decode module=repo status=discard reason=duplicate_id id={}",
                    task.id
                );
                decoded.discarded += 1;
            }
            Err(err) => {
                debug!(
                    "event=snapshot_decode module=repo status=discard reason=invalid_record error={}",
                    err
                );
                decoded.discarded += 1;
            }
        }
    }
    Some(decoded)
}

/// Encodes a task sequence into the snapshot wire shape.
pub fn encode_snapshot(tasks: &[Task]) -> RepoResult<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// Snapshot repository bound to one key of a key-value store.
#[derive(Debug, Clone)]
pub struct KvSnapshotRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvSnapshotRepository<S> {
    /// Uses the unscoped legacy key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, TASKS_SNAPSHOT_KEY)
    }

    /// Uses the key scoped to `user_id`.
    pub fn for_user(store: S, user_id: &str) -> Self {
        Self::with_key(store, snapshot_key_for(Some(user_id)))
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> SnapshotRepository for KvSnapshotRepository<S> {
    fn load(&self) -> Vec<Task> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=snapshot_load module=repo status=error error_code=snapshot_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match decode_snapshot(&raw) {
            Some(decoded) => {
                if decoded.discarded > 0 {
                    warn!(
                        "event=snapshot_load module=repo status=degraded kept={} discarded={}",
                        decoded.tasks.len(),
                        decoded.discarded
                    );
                }
                decoded.tasks
            }
            None => Vec::new(),
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let raw = encode_snapshot(tasks)?;
        self.store.set(&self.key, &raw)?;
        debug!(
            "event=snapshot_save module=repo status=ok count={}",
            tasks.len()
        );
        Ok(())
    }
}
