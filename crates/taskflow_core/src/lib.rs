//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task-store invariants:
//! normalized date keying, insertion ordering, and cross-view consistency.

pub mod calendar;
pub mod datetime;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use calendar::{DayCell, MonthView};
pub use datetime::{
    display_date, display_time, Clock, DateKey, DisplayLocale, FixedClock, FormatError,
    SystemClock, TimeOfDay,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskDraft, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_store::TaskStore;
pub use sync::change_bus::{ChangeBus, ChangeListener, ListenerId, TaskChange};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
