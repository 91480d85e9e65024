//! Flow timestamp formatting.
//!
//! Records carry timestamps as `YYYY-MM-DD HH:MM:SS.ffff +HHMM`, with four
//! truncated fractional digits and a numeric UTC offset.

use chrono::{DateTime, Utc};

/// Format a timestamp the way flow records expect it
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use flowsynth::utils::timestamp::format_timestamp;
///
/// let t = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(format_timestamp(&t), "2024-03-09 07:05:01.0000 +0000");
/// ```
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    // Leap seconds report nanos >= 1e9
    let fraction = (t.timestamp_subsec_nanos() / 100_000).min(9_999);
    format!(
        "{}.{:04} {}",
        t.format("%Y-%m-%d %H:%M:%S"),
        fraction,
        t.format("%z")
    )
}
