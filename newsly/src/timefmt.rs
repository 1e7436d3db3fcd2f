use chrono::{DateTime, Utc};

/// Human-friendly distance between `date` and `now`, e.g. "3 hours ago".
///
/// Months are 30 days and years 12 months. Anything under a minute (including
/// dates in the future) reads "just now" with a suffix and "now" without.
pub fn format_distance(date: DateTime<Utc>, now: DateTime<Utc>, add_suffix: bool) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 60 {
        return if add_suffix { "just now" } else { "now" }.to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    let (amount, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 30 {
        (days, "day")
    } else if months < 12 {
        (months, "month")
    } else {
        (years, "year")
    };

    let plural = if amount != 1 { "s" } else { "" };
    let suffix = if add_suffix { " ago" } else { "" };
    format!("{} {}{}{}", amount, unit, plural, suffix)
}

pub fn format_distance_to_now(date: DateTime<Utc>, add_suffix: bool) -> String {
    format_distance(date, Utc::now(), add_suffix)
}
