//! Slew rate limiting

use util::maths::clamp;

/// Bound the change from `previous` to `desired` to at most `max_delta`.
///
/// A `max_delta` of zero or less disables the limit and `desired` is
/// returned unchanged.
pub fn limit(desired: f64, previous: f64, max_delta: f64) -> f64 {
    if !(max_delta > 0.0) {
        return desired;
    }

    previous + clamp(&(desired - previous), &-max_delta, &max_delta)
}
