//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of milliseconds in a second
pub const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a std duration into milliseconds.
pub fn std_duration_to_millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * MILLIS_PER_SECOND
}
