//! Localized display rendering for date keys and times.
//!
//! # Responsibility
//! - Render `YYYY-MM-DD (Www)` date strings with localized weekday labels.
//! - Render 12-hour clock strings with a localized AM/PM label.
//!
//! # Invariants
//! - `display_date` output parses back to the same key via `DateKey::parse`.

use super::key::{DateKey, TimeOfDay};
use chrono::Weekday;

/// Label set used for weekday and AM/PM rendering.
///
/// The shipped app renders Korean labels; English is the neutral default
/// for tooling and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    #[default]
    En,
    Ko,
}

const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAYS_KO: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// Renders a date key as `YYYY-MM-DD (Www)`.
pub fn display_date(key: DateKey, locale: DisplayLocale) -> String {
    format!("{key} ({})", weekday_label(key.weekday(), locale))
}

/// Renders a time of day on a 12-hour clock with AM/PM label.
///
/// English puts the label after the time (`5:00 PM`), Korean before it
/// (`오후 5:00`), matching the shipped app.
pub fn display_time(time: TimeOfDay, locale: DisplayLocale) -> String {
    let hour = time.hour();
    let display_hour = match hour % 12 {
        0 => 12,
        other => other,
    };
    let afternoon = hour >= 12;

    match locale {
        DisplayLocale::En => {
            let label = if afternoon { "PM" } else { "AM" };
            format!("{}:{:02} {label}", display_hour, time.minute())
        }
        DisplayLocale::Ko => {
            let label = if afternoon { "오후" } else { "오전" };
            format!("{label} {}:{:02}", display_hour, time.minute())
        }
    }
}

fn weekday_label(weekday: Weekday, locale: DisplayLocale) -> &'static str {
    let index = weekday.num_days_from_sunday() as usize;
    match locale {
        DisplayLocale::En => WEEKDAYS_EN[index],
        DisplayLocale::Ko => WEEKDAYS_KO[index],
    }
}
