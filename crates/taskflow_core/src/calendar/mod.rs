//! Month-grid aggregation over the task store.
//!
//! # Responsibility
//! - Derive the day cells a month-grid view renders, including task
//!   markers, from store queries alone.
//!
//! # Invariants
//! - Cells are recomputed from scratch on every call; nothing is cached
//!   across mutations.

pub mod grid;

pub use grid::{DayCell, MonthView};
