//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of microseconds in a second
pub const MICROS_PER_SECOND: f64 = 1e6;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}

/// Get the number of microseconds between two readings of a wrapping
/// microsecond counter.
///
/// The counter is allowed to wrap once between `earlier` and `later`.
pub fn micros_since(earlier: u32, later: u32) -> u32 {
    later.wrapping_sub(earlier)
}

/// Get the number of seconds between two readings of a wrapping microsecond
/// counter.
pub fn secs_since(earlier: u32, later: u32) -> f64 {
    micros_since(earlier, later) as f64 / MICROS_PER_SECOND
}
