//! Canonical date key and time-of-day values.
//!
//! # Responsibility
//! - Normalize every date input to one `YYYY-MM-DD` partition key.
//! - Accept the legacy unseparated `YYYYMMDD` form and the display form
//!   `YYYY-MM-DD (Www)` so pre-migration rows stay readable.
//!
//! # Invariants
//! - Construction is the only validation point; a held value is always a
//!   real calendar date / wall-clock time.
//! - `Display` output is the canonical storage form.

use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

// Either dashed or unseparated digits. The trailing weekday annotation
// produced by `display_date` only ever follows the dashed form, so it is
// anchored to that alternative alone.
static DATE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{4})-(\d{2})-(\d{2})(?: \([^)]+\))?|(\d{4})(\d{2})(\d{2}))$")
        .expect("valid date key pattern")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid time pattern"));

pub type FormatResult<T> = Result<T, FormatError>;

/// Parse/construction error for date keys and times of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Input text does not match any supported shape.
    Malformed(String),
    /// Shape was fine but the value is not a real calendar date.
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Shape was fine but hour/minute are out of range.
    InvalidTime { hour: u32, minute: u32 },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(input) => write!(f, "unparseable date/time text: `{input}`"),
            Self::InvalidDate { year, month, day } => {
                write!(f, "no such calendar date: {year:04}-{month:02}-{day:02}")
            }
            Self::InvalidTime { hour, minute } => {
                write!(f, "no such time of day: {hour:02}:{minute:02}")
            }
        }
    }
}

impl Error for FormatError {}

/// Canonical `YYYY-MM-DD` key identifying one calendar day.
///
/// Used as the task partition key. Comparison and ordering follow calendar
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Builds a key from calendar components.
    pub fn new(year: i32, month: u32, day: u32) -> FormatResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(FormatError::InvalidDate { year, month, day })
    }

    /// Parses a date key from any supported text form.
    ///
    /// Accepted:
    /// - canonical `2024-03-05`
    /// - legacy unseparated `20240305`
    /// - display form `2024-03-05 (Tue)` (weekday annotation is ignored;
    ///   it never combines with the unseparated form, which no writer
    ///   ever produced annotated)
    pub fn parse(input: &str) -> FormatResult<Self> {
        let trimmed = input.trim();
        let captures = DATE_KEY_RE
            .captures(trimmed)
            .ok_or_else(|| FormatError::Malformed(trimmed.to_string()))?;

        let group = |dashed: usize, plain: usize| {
            captures
                .get(dashed)
                .or_else(|| captures.get(plain))
                .map(|m| m.as_str())
        };

        let (year, month, day) = match (group(1, 4), group(2, 5), group(3, 6)) {
            (Some(y), Some(m), Some(d)) => (y, m, d),
            _ => return Err(FormatError::Malformed(trimmed.to_string())),
        };

        // Groups are all-digit by construction, so the only parse failure
        // left is a year outside i32 range.
        let year: i32 = year
            .parse()
            .map_err(|_| FormatError::Malformed(trimmed.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| FormatError::Malformed(trimmed.to_string()))?;
        let day: u32 = day
            .parse()
            .map_err(|_| FormatError::Malformed(trimmed.to_string()))?;

        Self::new(year, month, day)
    }

    /// Wraps an already-validated calendar date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying calendar date for arithmetic.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DateKey {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Wall-clock time `HH:MM`, stored in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> FormatResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(FormatError::InvalidTime { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Parses the canonical `HH:MM` storage form.
    pub fn parse(input: &str) -> FormatResult<Self> {
        let trimmed = input.trim();
        let captures = TIME_RE
            .captures(trimmed)
            .ok_or_else(|| FormatError::Malformed(trimmed.to_string()))?;

        let hour: u32 = captures[1]
            .parse()
            .map_err(|_| FormatError::Malformed(trimmed.to_string()))?;
        let minute: u32 = captures[2]
            .parse()
            .map_err(|_| FormatError::Malformed(trimmed.to_string()))?;

        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
