//! Date and duration formatting for the panel list.
//!
//! Pure helpers; everything takes the reference date explicitly so the
//! formatting is deterministic under test.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Formats a clock time as `2:05 PM`.
pub fn clock_time(time: NaiveDateTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Formats a date as `3/4/2024`.
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Formats the heading shown above the first event of a day: `Today`,
/// `Tomorrow`, the weekday name within the coming week, or the date.
pub fn day_heading(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else if date < today + Duration::days(7) {
        date.format("%A").to_string()
    } else {
        short_date(date)
    }
}

/// Formats a meeting duration: `All day`, `30 mins`, `1 hour`, `1.5 hrs`.
///
/// A non-positive duration renders as an empty string rather than a
/// negative count.
pub fn duration_text(start: NaiveDateTime, end: NaiveDateTime, is_all_day: bool) -> String {
    if is_all_day {
        return "All day".to_string();
    }

    let minutes = (end - start).num_minutes();
    if minutes <= 0 {
        String::new()
    } else if minutes < 60 {
        format!("{minutes} mins")
    } else if minutes == 60 {
        "1 hour".to_string()
    } else {
        let hours = (minutes as f64 / 60.0 * 10.0).round() / 10.0;
        if hours.fract() == 0.0 {
            format!("{} hrs", hours as i64)
        } else {
            format!("{hours} hrs")
        }
    }
}

/// Formats a task due date relative to `today`: `Overdue, 3/1/2024`,
/// `Due Today`, `Due Tomorrow`, or `Due 3/8/2024`.
pub fn due_text(due: NaiveDate, today: NaiveDate) -> String {
    if due < today {
        format!("Overdue, {}", short_date(due))
    } else if due == today {
        "Due Today".to_string()
    } else if due == today + Duration::days(1) {
        "Due Tomorrow".to_string()
    } else {
        format!("Due {}", short_date(due))
    }
}
