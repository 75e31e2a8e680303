//! Small shared helpers.

use chrono::{TimeZone, Utc};

/// Formats epoch seconds as a `HH:MM:SS` UTC clock for headers and logs.
pub fn format_clock(epoch_secs: i64) -> String {
    match Utc.timestamp_opt(epoch_secs, 0).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
