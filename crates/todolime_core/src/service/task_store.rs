//! In-memory task list with snapshot write-through.
//!
//! # Responsibility
//! - Own the ordered task sequence for one session.
//! - Apply add/remove/toggle/edit intents and persist after each change.
//!
//! # Invariants
//! - Operations are total: they never return errors to callers.
//! - Blank text is rejected by both `add` and `edit_text` (no-op).
//! - Ids are strictly increasing, even when the clock stalls or goes back.
//! - Only operations that changed the list trigger a snapshot write.
//! - A failed snapshot write is logged and the in-memory change is kept.

use crate::model::filter::{filter_tasks, FilterMode, TaskCounts};
use crate::model::task::{Priority, Task, TaskId};
use crate::repo::snapshot_repo::SnapshotRepository;
use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond time source for id generation.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Session-owned task list.
pub struct TaskStore<R: SnapshotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    tasks: Vec<Task>,
    last_id: TaskId,
}

impl<R: SnapshotRepository> TaskStore<R, SystemClock> {
    /// Loads the stored snapshot and uses the wall clock for new ids.
    pub fn hydrate(repo: R) -> Self {
        Self::hydrate_with_clock(repo, SystemClock)
    }
}

impl<R: SnapshotRepository, C: Clock> TaskStore<R, C> {
    /// Loads the stored snapshot with a caller-provided clock.
    pub fn hydrate_with_clock(repo: R, clock: C) -> Self {
        let tasks = repo.load();
        let last_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        info!(
            "event=task_store_hydrate module=service status=ok count={}",
            tasks.len()
        );
        Self {
            repo,
            clock,
            tasks,
            last_id,
        }
    }

    /// Appends a task and returns its id.
    ///
    /// Returns `None` without touching storage when `text` is blank or the
    /// id space is exhausted.
    pub fn add(&mut self, text: &str, priority: Priority) -> Option<TaskId> {
        let Some(id) = self.peek_next_id() else {
            warn!(
                "event=task_add module=service status=skip reason=id_exhausted last_id={}",
                self.last_id
            );
            return None;
        };
        let task = match Task::new(id, text, priority) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=service status=skip reason={err}");
                return None;
            }
        };
        self.last_id = id;
        self.tasks.push(task);
        self.persist("task_add");
        Some(id)
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist("task_remove");
        true
    }

    /// Flips `done` on the task with `id`. Returns whether it existed.
    pub fn toggle_done(&mut self, id: TaskId) -> bool {
        self.mutate(id, "task_toggle_done", |task| {
            task.toggle_done();
            true
        })
    }

    /// Flips `important` on the task with `id`. Returns whether it existed.
    pub fn toggle_important(&mut self, id: TaskId) -> bool {
        self.mutate(id, "task_toggle_important", |task| {
            task.toggle_important();
            true
        })
    }

    /// Replaces the text of the task with `id`.
    ///
    /// Blank text and unchanged text are no-ops. Returns whether the text changed.
    pub fn edit_text(&mut self, id: TaskId, new_text: &str) -> bool {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            debug!("event=task_edit_text module=service status=skip reason=empty_text id={id}");
            return false;
        }
        self.mutate(id, "task_edit_text", |task| {
            if task.text == trimmed {
                return false;
            }
            task.text = trimmed.to_string();
            true
        })
    }

    /// Full sequence in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Filtered projection; recomputed on every call.
    pub fn view(&self, mode: FilterMode) -> Vec<&Task> {
        filter_tasks(&self.tasks, mode)
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn peek_next_id(&self) -> Option<TaskId> {
        let after_last = self.last_id.checked_add(1)?;
        Some(self.clock.now_ms().max(after_last))
    }

    fn mutate(&mut self, id: TaskId, event: &str, apply: impl FnOnce(&mut Task) -> bool) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event={event} module=service status=skip reason=not_found id={id}");
            return false;
        };
        if !apply(task) {
            return false;
        }
        self.persist(event);
        true
    }

    fn persist(&self, event: &str) {
        if let Err(err) = self.repo.save(&self.tasks) {
            warn!(
                "event={} module=service status=error error_code=snapshot_save_failed count={} error={}",
                event,
                self.tasks.len(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, TaskStore};
    use crate::model::task::{Priority, Task};
    use crate::repo::kv_store::RepoResult;
    use crate::repo::snapshot_repo::SnapshotRepository;
    use std::cell::{Cell, RefCell};

    struct FrozenClock(i64);

    impl Clock for FrozenClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    #[derive(Default)]
    struct CountingRepo {
        saves: Cell<usize>,
        last: RefCell<Vec<Task>>,
    }

    impl SnapshotRepository for &CountingRepo {
        fn load(&self) -> Vec<Task> {
            self.last.borrow().clone()
        }

        fn save(&self, tasks: &[Task]) -> RepoResult<()> {
            self.saves.set(self.saves.get() + 1);
            *self.last.borrow_mut() = tasks.to_vec();
            Ok(())
        }
    }

    #[test]
    fn frozen_clock_still_yields_increasing_ids() {
        let repo = CountingRepo::default();
        let mut store = TaskStore::hydrate_with_clock(&repo, FrozenClock(1_000));

        let first = store.add("a", Priority::Low).expect("first add");
        let second = store.add("b", Priority::Low).expect("second add");
        let third = store.add("c", Priority::Low).expect("third add");
        assert_eq!((first, second, third), (1_000, 1_001, 1_002));
    }

    #[test]
    fn ids_continue_after_hydrated_maximum() {
        let repo = CountingRepo::default();
        repo.last
            .borrow_mut()
            .push(Task::new(5_000, "existing", Priority::High).expect("valid task"));

        let mut store = TaskStore::hydrate_with_clock(&repo, FrozenClock(10));
        assert_eq!(store.add("next", Priority::Medium), Some(5_001));
    }

    #[test]
    fn no_op_operations_skip_snapshot_writes() {
        let repo = CountingRepo::default();
        let mut store = TaskStore::hydrate_with_clock(&repo, FrozenClock(1));

        assert_eq!(store.add("   ", Priority::Medium), None);
        assert!(!store.remove(42));
        assert!(!store.toggle_done(42));
        assert!(!store.toggle_important(42));
        assert!(!store.edit_text(42, "anything"));
        assert_eq!(repo.saves.get(), 0);

        let id = store.add("real", Priority::Medium).expect("add");
        assert!(!store.edit_text(id, "  real  "));
        assert!(!store.edit_text(id, ""));
        assert_eq!(repo.saves.get(), 1);
    }
}
