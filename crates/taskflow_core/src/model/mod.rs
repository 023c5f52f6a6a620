//! Domain model for the task tracker core.
//!
//! # Responsibility
//! - Define the canonical task record mapped to `todo_table`.
//! - Validate user input before it reaches persistence.
//!
//! # Invariants
//! - A task id identifies exactly one record for its lifetime; ids are
//!   never recycled after deletion.
//! - `date` is always a normalized `YYYY-MM-DD` key.

pub mod task;
