//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the range `[min, max]`.
///
/// NaN values are passed through unchanged.
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

/// Arithmetic mean of two values.
pub fn mean2<T>(a: T, b: T) -> T
where
    T: Float
{
    (a + b) / (T::one() + T::one())
}

/// Determine whether `a` and `b` are equal within the given relative
/// tolerance.
///
/// Values very close to zero are compared absolutely against the tolerance.
pub fn approx_eq_rel<T>(a: T, b: T, rel_tol: T) -> bool
where
    T: Float
{
    let scale = a.abs().max(b.abs()).max(T::one());
    (a - b).abs() <= rel_tol * scale
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&0.5f64, &-1.0, &1.0), 0.5);
        assert_eq!(clamp(&1.5f64, &-1.0, &1.0), 1.0);
        assert_eq!(clamp(&-3.0f64, &-1.0, &1.0), -1.0);
        assert_eq!(clamp(&0.9f64, &-0.2, &0.2), 0.2);
        assert!(clamp(&f64::NAN, &-1.0, &1.0).is_nan());
    }

    #[test]
    fn test_mean2() {
        assert_eq!(mean2(58f64, 62f64), 60.0);
        assert_eq!(mean2(-1f64, 1f64), 0.0);
    }

    #[test]
    fn test_approx_eq_rel() {
        assert!(approx_eq_rel(1.0f64, 1.0 + 1e-12, 1e-9));
        assert!(!approx_eq_rel(1.0f64, 1.001, 1e-9));
        assert!(approx_eq_rel(1e12f64, 1e12 + 1.0, 1e-9));
        assert!(approx_eq_rel(0.0f64, 1e-12, 1e-9));
    }
}
