//! Filter projections over a task sequence.
//!
//! # Invariants
//! - Projections never reorder tasks.
//! - `Todo` and `Done` partition any sequence.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// View selector for the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Todo,
    Done,
    Important,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 4] = [Self::All, Self::Todo, Self::Done, Self::Important];

    /// Stable lowercase id used by UI bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Todo => "todo",
            Self::Done => "done",
            Self::Important => "important",
        }
    }

    /// Returns whether `task` is visible under this mode.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Todo => !task.done,
            Self::Done => task.done,
            Self::Important => task.important,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterModeParseError(pub String);

impl Display for FilterModeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|todo|done|important",
            self.0
        )
    }
}

impl Error for FilterModeParseError {}

impl FromStr for FilterMode {
    type Err = FilterModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "todo" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            "important" => Ok(Self::Important),
            other => Err(FilterModeParseError(other.to_string())),
        }
    }
}

/// Projects `tasks` through `mode`, keeping relative order.
pub fn filter_tasks(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

/// Per-mode totals for filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub todo: usize,
    pub done: usize,
    pub important: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            counts.all += 1;
            if task.done {
                counts.done += 1;
            } else {
                counts.todo += 1;
            }
            if task.important {
                counts.important += 1;
            }
            counts
        })
    }

    /// Returns the total for one mode.
    pub fn get(&self, mode: FilterMode) -> usize {
        match mode {
            FilterMode::All => self.all,
            FilterMode::Todo => self.todo,
            FilterMode::Done => self.done,
            FilterMode::Important => self.important,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, FilterMode, TaskCounts};
    use crate::model::task::{Priority, Task};

    fn task(id: i64, done: bool, important: bool) -> Task {
        let mut task = Task::new(id, format!("task {id}"), Priority::Medium).expect("valid task");
        task.done = done;
        task.important = important;
        task
    }

    #[test]
    fn parses_known_modes_and_rejects_others() {
        for mode in FilterMode::ALL_MODES {
            assert_eq!(mode.as_str().parse::<FilterMode>(), Ok(mode));
        }
        assert_eq!(" Done ".parse::<FilterMode>(), Ok(FilterMode::Done));
        assert!("archived".parse::<FilterMode>().is_err());
    }

    #[test]
    fn important_mode_ignores_done_flag() {
        let tasks = vec![task(1, true, true), task(2, false, false), task(3, false, true)];
        let ids: Vec<i64> = filter_tasks(&tasks, FilterMode::Important)
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn counts_match_projections() {
        let tasks = vec![task(1, true, true), task(2, false, false), task(3, false, true)];
        let counts = TaskCounts::from_tasks(&tasks);
        for mode in FilterMode::ALL_MODES {
            assert_eq!(counts.get(mode), filter_tasks(&tasks, mode).len());
        }
    }
}
