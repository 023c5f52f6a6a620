//! Day-cell derivation for one target month.
//!
//! # Responsibility
//! - Compute leading blanks, per-day flags and task markers for a month.
//!
//! # Invariants
//! - Weeks start on Sunday regardless of OS locale; leading blank count is
//!   the Sunday-based weekday index of the 1st (0..=6).
//! - One cell per real day after the blanks; no trailing padding.
//! - The selected date is an explicit parameter, not shared state.

use crate::datetime::{Clock, DateKey, FormatError};
use crate::repo::task_repo::{RepoResult, TaskRepository};
use crate::service::task_store::TaskStore;
use chrono::{Datelike, NaiveDate};

/// One square of the month grid, derived per render and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// Day of month, or `None` for a leading blank.
    pub day: Option<u8>,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_tasks: bool,
}

impl DayCell {
    fn blank() -> Self {
        Self {
            day: None,
            is_today: false,
            is_selected: false,
            has_tasks: false,
        }
    }
}

/// A validated target month plus the externally supplied selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
    selected: Option<DateKey>,
}

impl MonthView {
    /// Builds a view for `year`/`month` (1-indexed month).
    ///
    /// Rejects impossible months up front so cell derivation cannot fail
    /// on date arithmetic.
    pub fn new(year: i32, month: u32, selected: Option<DateKey>) -> Result<Self, FormatError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(FormatError::InvalidDate {
            year,
            month,
            day: 1,
        })?;

        Ok(Self { first, selected })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    /// Derives the full cell sequence for this month.
    ///
    /// `is_today` comes from the store's injected clock, `has_tasks` from
    /// count-only store queries. Always a fresh computation.
    pub fn cells<R: TaskRepository, C: Clock>(
        &self,
        store: &TaskStore<R, C>,
    ) -> RepoResult<Vec<DayCell>> {
        let today = store.today();
        let leading_blanks = self.first.weekday().num_days_from_sunday() as usize;

        let mut cells = Vec::with_capacity(leading_blanks + 31);
        cells.extend(std::iter::repeat(DayCell::blank()).take(leading_blanks));

        let month = self.first.month();
        for date in self.first.iter_days().take_while(|d| d.month() == month) {
            let key = DateKey::from_naive(date);
            cells.push(DayCell {
                day: Some(date.day() as u8),
                is_today: key == today,
                is_selected: self.selected == Some(key),
                has_tasks: store.has_any(key)?,
            });
        }

        Ok(cells)
    }
}
