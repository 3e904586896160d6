use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

#[must_use]
pub fn format_seconds_remaining(seconds: u32) -> String {
    if seconds == 1 {
        "1 second remaining".to_owned()
    } else {
        format!("{seconds} seconds remaining")
    }
}

/// `start → end` as entered, or a dash for blank bounds.
#[must_use]
pub fn format_window(start: &str, end: &str) -> String {
    let or_dash = |s: &str| {
        let s = s.trim();
        if s.is_empty() { "-".to_owned() } else { s.replace('T', " ") }
    };
    format!("{} → {}", or_dash(start), or_dash(end))
}
