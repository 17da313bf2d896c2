//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted in the local snapshot.
//! - Validate records on construction and on deserialization.
//!
//! # Invariants
//! - `id` is positive and unique within one snapshot.
//! - `text` is stored trimmed and is never empty.
//! - Missing `priority`, `done` and `important` fields take their defaults,
//!   so snapshots written before those fields existed still load.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier, derived from creation time in epoch milliseconds.
pub type TaskId = i64;

/// Task priority shown next to each entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Stable label used in snapshots and UI pickers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parses a label case-insensitively, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace-only.
    EmptyText,
    /// Text has leading or trailing whitespace.
    UntrimmedText,
    /// Identifier is zero or negative.
    InvalidId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::UntrimmedText => write!(f, "task text must not start or end with whitespace"),
            Self::InvalidId(id) => write!(f, "task id must be positive, got {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// One entry of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub done: bool,
    pub important: bool,
}

impl Task {
    /// Creates an open, non-important task.
    ///
    /// `text` is trimmed before storage.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    /// - `InvalidId` when `id` is not positive.
    pub fn new(
        id: TaskId,
        text: impl AsRef<str>,
        priority: Priority,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: text.as_ref().trim().to_string(),
            priority,
            done: false,
            important: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id <= 0 {
            return Err(TaskValidationError::InvalidId(self.id));
        }
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        if trimmed.len() != self.text.len() {
            return Err(TaskValidationError::UntrimmedText);
        }
        Ok(())
    }

    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }

    pub fn toggle_important(&mut self) {
        self.important = !self.important;
    }
}

/// Lenient input shape; required fields stay required.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    text: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    important: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            text: record.text.trim().to_string(),
            priority: record.priority,
            done: record.done,
            important: record.important,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskValidationError};

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn new_trims_text_and_rejects_blank() {
        let task = Task::new(7, "  water plants ", Priority::Low).expect("valid task");
        assert_eq!(task.text, "water plants");

        let err = Task::new(8, " \t ", Priority::Low).expect_err("blank text must fail");
        assert_eq!(err, TaskValidationError::EmptyText);
    }

    #[test]
    fn validate_rejects_untrimmed_text() {
        let mut task = Task::new(9, "a", Priority::Medium).expect("valid task");
        task.text = " a ".to_string();
        assert_eq!(task.validate(), Err(TaskValidationError::UntrimmedText));

        task.text = "a  b".to_string();
        assert_eq!(task.validate(), Ok(()));
    }

    #[test]
    fn new_rejects_non_positive_id() {
        let err = Task::new(0, "x", Priority::Medium).expect_err("zero id must fail");
        assert_eq!(err, TaskValidationError::InvalidId(0));
    }
}
