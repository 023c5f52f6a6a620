//! Date and time primitives for the task core.
//!
//! # Responsibility
//! - Define the canonical `YYYY-MM-DD` date key and `HH:MM` time-of-day.
//! - Parse legacy key forms kept for pre-migration data compatibility.
//! - Render localized display strings for dates and times.
//! - Provide an injectable clock so "today" is testable.
//!
//! # Invariants
//! - A constructed `DateKey`/`TimeOfDay` is always a valid calendar value.
//! - `DateKey::parse(&display_date(d, locale)) == d` for every valid `d`.

pub mod clock;
pub mod display;
pub mod key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use display::{display_date, display_time, DisplayLocale};
pub use key::{DateKey, FormatError, TimeOfDay};
