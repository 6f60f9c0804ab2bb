//! Formatting helpers shared by report renderers.

use chrono::NaiveDate;

/// Format minutes for display (e.g., "312h 45m").
pub fn duration_display(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Day name from a weekday index (0 = Sunday).
pub fn day_name(day: usize) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}

/// Month name from a month index (0 = January).
pub fn month_name(month: usize) -> &'static str {
    match month {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Unknown",
    }
}

/// Hour range display (e.g., "10am-11am").
pub fn hour_display(hour: usize) -> String {
    let label = |h: usize| {
        let h12 = if h % 12 == 0 { 12 } else { h % 12 };
        let period = if h % 24 < 12 { "am" } else { "pm" };
        format!("{}{}", h12, period)
    };
    format!("{}-{}", label(hour), label((hour + 1) % 24))
}

/// Short date (e.g., "Mar 04").
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Pluralize a unit (e.g., "1 day", "3 days").
pub fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
