//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the inclusive range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Move `current` towards `target` by at most `step`.
///
/// The result never passes `target`, so repeated application lands on
/// `target` exactly. `step` must be positive.
pub fn step_towards<T>(current: T, target: T, step: T) -> T
where
    T: Float
{
    if target >= current {
        (current + step).min(target)
    }
    else {
        (current - step).max(target)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((-1f64, 1f64), (45f64, 135f64), 0f64), 90f64);
        assert_eq!(lin_map((-1f64, 1f64), (45f64, 135f64), -1f64), 45f64);
        assert_eq!(lin_map((-1f64, 1f64), (45f64, 135f64), 0.5f64), 112.5f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(2f64, -1f64, 1f64), 1f64);
        assert_eq!(clamp(-2f64, -1f64, 1f64), -1f64);
        assert_eq!(clamp(0.25f64, -1f64, 1f64), 0.25f64);
    }

    #[test]
    fn test_step_towards() {
        assert_eq!(step_towards(0f64, 2.5f64, 1f64), 1f64);
        assert_eq!(step_towards(2f64, 2.5f64, 1f64), 2.5f64);
        assert_eq!(step_towards(2.5f64, 2.5f64, 1f64), 2.5f64);
        assert_eq!(step_towards(10f64, 8.5f64, 1f64), 9f64);
        assert_eq!(step_towards(9f64, 8.5f64, 1f64), 8.5f64);
    }
}
