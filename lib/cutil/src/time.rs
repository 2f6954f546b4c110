//! Time and date utilities for timestamp formatting.

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Formats the current local time according to the specified format string.
///
/// The format string follows the same syntax as `chrono::format::strftime`.
pub fn local_now(format: &str) -> String {
    Local::now().format(format).to_string()
}

/// Formats a `SystemTime` as local time according to the specified format
/// string.
///
/// Used for file modification timestamps (e.g. `%Y-%m-%dT%H:%M:%S` for
/// ISO 8601).
///
/// # Examples
///
/// ```
/// use cutil::time::format_system_time;
/// use std::time::SystemTime;
///
/// let formatted = format_system_time(SystemTime::UNIX_EPOCH, "%Y");
/// assert_eq!(formatted.len(), 4);
/// ```
pub fn format_system_time(time: SystemTime, format: &str) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_local_now() {
        let formatted = local_now("%Y-%m-%d");
        assert_eq!(formatted.len(), 10);
    }

    #[test]
    fn test_format_system_time_iso8601() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(86400);
        let formatted = format_system_time(time, "%Y-%m-%dT%H:%M:%S");

        // local offset shifts the clock but not the shape
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[10..11], "T");
    }
}
