//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle in degrees into the range (-180, 180].
pub fn wrap_deg<T>(angle: T) -> T
where
    T: Float
{
    let half_turn: T = T::from(180.0).unwrap();
    let full_turn: T = T::from(360.0).unwrap();

    let r = rem_euclid(angle, full_turn);

    if r > half_turn {
        r - full_turn
    }
    else {
        r
    }
}

/// Get the signed shortest angular distance in degrees needed to go from
/// `from` to `to`.
///
/// The result lies in (-180, 180], so a positive value means turning in the
/// positive direction is shortest.
pub fn get_ang_dist_deg<T>(to: T, from: T) -> T
where
    T: Float
{
    wrap_deg(to - from)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}
