//! File size utilities: unit constants, conversions and pretty printing.

/// Kilobytes constant (1024 bytes)
pub const KB: u64 = 1024;

/// Megabytes constant (1024 * 1024 bytes)
pub const MB: u64 = KB * 1024;

/// Gigabytes constant (1024 * 1024 * 1024 bytes)
pub const GB: u64 = MB * 1024;

/// Converts bytes to kilobytes.
#[inline]
pub fn bytes_to_kb(bytes: u64) -> f64 {
    bytes as f64 / KB as f64
}

/// Converts bytes to megabytes.
#[inline]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MB as f64
}

/// Converts bytes to gigabytes.
#[inline]
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GB as f64
}

/// Formats a byte size into a human-readable string with appropriate unit.
///
/// Selects the largest fitting unit (B, KB, MB, GB) and formats larger
/// units with 2 decimal places.
///
/// # Examples
///
/// ```
/// use cutil::fs::pretty_bytes_size;
///
/// assert_eq!(pretty_bytes_size(512), "512 B");
/// assert_eq!(pretty_bytes_size(1024), "1.00 KB");
/// assert_eq!(pretty_bytes_size(1500), "1.46 KB");
/// assert_eq!(pretty_bytes_size(1024 * 1024), "1.00 MB");
/// ```
pub fn pretty_bytes_size(bytes: u64) -> String {
    if bytes >= GB {
        format!("{:.2} GB", bytes_to_gb(bytes))
    } else if bytes >= MB {
        format!("{:.2} MB", bytes_to_mb(bytes))
    } else if bytes >= KB {
        format!("{:.2} KB", bytes_to_kb(bytes))
    } else {
        format!("{bytes} B")
    }
}
