//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task-list intents to the UI as sync, panic-free calls.
//! - Hydrate a fresh task store per call from the shared SQLite file.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - No-op intents (blank text, unknown id) report `changed=false`, not failure.
//! - `user_id` selects the per-user snapshot; `None` uses the unscoped key.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use todolime_core::db::open_db;
use todolime_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FilterMode, KvSnapshotRepository, Priority, SqliteKeyValueStore, Task, TaskCounts, TaskId,
    TaskStore,
};

const DB_FILE_NAME: &str = "todolime.sqlite3";
const DB_PATH_ENV: &str = "TODOLIME_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    /// `Low|Medium|High`.
    pub priority: String,
    pub done: bool,
    pub important: bool,
}

/// Counters for filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskTabCounts {
    pub all: u32,
    pub todo: u32,
    pub done: u32,
    pub important: u32,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksListResponse {
    pub ok: bool,
    /// Tasks visible under `applied_filter`, in insertion order.
    pub items: Vec<TaskItem>,
    pub counts: TaskTabCounts,
    /// Normalized filter id actually used.
    pub applied_filter: String,
    pub message: String,
}

/// Mutation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the call completed (storage opened, input parsed).
    pub ok: bool,
    /// Whether the task list changed.
    pub changed: bool,
    /// Id of the created or targeted task when known.
    pub task_id: Option<i64>,
    pub message: String,
}

impl TaskActionResponse {
    fn applied(changed: bool, task_id: Option<TaskId>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Lists tasks under `filter` (`all|todo|done|important`).
///
/// Unknown filters fall back to `all`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: String, user_id: Option<String>) -> TasksListResponse {
    let mode = filter.parse::<FilterMode>().unwrap_or_else(|err| {
        warn!("event=ffi_tasks_list module=ffi status=fallback reason={err}");
        FilterMode::All
    });

    match with_task_store(user_id.as_deref(), |store| {
        let items: Vec<TaskItem> = store.view(mode).into_iter().map(to_task_item).collect();
        (items, store.counts())
    }) {
        Ok((items, counts)) => TasksListResponse {
            ok: true,
            items,
            counts: to_tab_counts(counts),
            applied_filter: mode.as_str().to_string(),
            message: String::new(),
        },
        Err(err) => TasksListResponse {
            ok: false,
            items: Vec::new(),
            counts: TaskTabCounts::default(),
            applied_filter: mode.as_str().to_string(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Adds a task. Blank text or an exhausted id space is ignored (`changed=false`).
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String, priority: String, user_id: Option<String>) -> TaskActionResponse {
    let Some(priority) = Priority::parse(&priority) else {
        return TaskActionResponse::failure(format!(
            "task_add failed: unsupported priority `{}`; expected Low|Medium|High",
            priority.trim()
        ));
    };

    match with_task_store(user_id.as_deref(), |store| store.add(&text, priority)) {
        Ok(Some(id)) => TaskActionResponse::applied(true, Some(id), "Task added."),
        Ok(None) => TaskActionResponse::applied(false, None, "Task not added."),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(id: i64, user_id: Option<String>) -> TaskActionResponse {
    apply_to_task("task_remove", id, user_id, |store| store.remove(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_done(id: i64, user_id: Option<String>) -> TaskActionResponse {
    apply_to_task("task_toggle_done", id, user_id, |store| store.toggle_done(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_important(id: i64, user_id: Option<String>) -> TaskActionResponse {
    apply_to_task("task_toggle_important", id, user_id, |store| {
        store.toggle_important(id)
    })
}

/// Replaces task text. Blank text is ignored (`changed=false`).
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit_text(id: i64, text: String, user_id: Option<String>) -> TaskActionResponse {
    apply_to_task("task_edit_text", id, user_id, |store| {
        store.edit_text(id, &text)
    })
}

type FfiTaskStore<'conn> = TaskStore<KvSnapshotRepository<SqliteKeyValueStore<'conn>>>;

fn apply_to_task(
    operation: &str,
    id: TaskId,
    user_id: Option<String>,
    f: impl FnOnce(&mut FfiTaskStore<'_>) -> bool,
) -> TaskActionResponse {
    match with_task_store(user_id.as_deref(), f) {
        Ok(true) => TaskActionResponse::applied(true, Some(id), "Task updated."),
        Ok(false) => TaskActionResponse::applied(false, Some(id), "No changes."),
        Err(err) => TaskActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn with_task_store<T>(
    user_id: Option<&str>,
    f: impl FnOnce(&mut FfiTaskStore<'_>) -> T,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let kv = SqliteKeyValueStore::new(&conn);
    let repo = match user_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => KvSnapshotRepository::for_user(kv, id),
        None => KvSnapshotRepository::new(kv),
    };
    let mut store = TaskStore::hydrate(repo);
    Ok(f(&mut store))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        text: task.text.clone(),
        priority: task.priority.as_str().to_string(),
        done: task.done,
        important: task.important,
    }
}

fn to_tab_counts(counts: TaskCounts) -> TaskTabCounts {
    let clamp = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    TaskTabCounts {
        all: clamp(counts.all),
        todo: clamp(counts.todo),
        done: clamp(counts.done),
        important: clamp(counts.important),
    }
}
