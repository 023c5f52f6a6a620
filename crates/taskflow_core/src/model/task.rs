//! Task record and validated draft input.
//!
//! # Responsibility
//! - Mirror the persisted `todo_table` row as a typed record.
//! - Make `TaskDraft` the single validation gate for user input.
//!
//! # Invariants
//! - `description` is trimmed and non-empty once a draft exists.
//! - `date`/`time` are immutable after creation; only `completed` and
//!   `description` are mutated in place.

use crate::datetime::{DateKey, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable row identifier assigned by SQLite on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// Validation failure for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Description was empty (or whitespace-only) after trimming.
    EmptyDescription,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, assigned on creation, never reused.
    pub id: TaskId,
    /// Partition key: the calendar day this task is due.
    pub date: DateKey,
    /// Optional due time; `None` means "no specific time".
    pub time: Option<TimeOfDay>,
    /// Trimmed, non-empty task text. Serialized as `task` to match the
    /// persisted column name.
    #[serde(rename = "task")]
    pub description: String,
    pub completed: bool,
    /// Storage timestamp used only for stable insertion ordering within a
    /// date; ties break by `id`.
    pub created_at: String,
}

/// Validated input for creating one task.
///
/// Construction is the validation point: a draft can only exist with a
/// trimmed, non-empty description, and `DateKey`/`TimeOfDay` are valid by
/// type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    date: DateKey,
    time: Option<TimeOfDay>,
    description: String,
}

impl TaskDraft {
    pub fn new(
        date: DateKey,
        time: Option<TimeOfDay>,
        description: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let description = normalize_description(description)?;
        Ok(Self {
            date,
            time,
            description,
        })
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn time(&self) -> Option<TimeOfDay> {
        self.time
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Trims description input and rejects whitespace-only text.
///
/// Shared by draft construction and description edits so both paths apply
/// identical rules.
pub fn normalize_description(input: impl Into<String>) -> Result<String, TaskValidationError> {
    let trimmed = input.into().trim().to_string();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    Ok(trimmed)
}
