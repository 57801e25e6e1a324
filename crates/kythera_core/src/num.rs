//! Numeric kernels shared by constant checks in the compiler and by the runtime.
//!
//! Integer division in Kythera rounds toward negative infinity, and the remainder takes the sign of the divisor,
//! so that `a == (a / b) * b + a % b` always holds.

/// Floor division for integers (rounds toward negative infinity).
///
/// ## Parameters
/// - `a`: dividend
/// - `b`: divisor (must be non-zero)
///
/// ## Returns
/// - (`i64`): quotient rounded toward negative infinity.
#[inline]
pub fn floor_div_i64(a: i64, b: i64) -> i64 {
    debug_assert!(b != 0);
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if (r > 0 && b < 0) || (r < 0 && b > 0) { q - 1 } else { q }
}

/// Floor modulo for integers (sign of divisor).
///
/// ## Parameters
/// - `a`: dividend
/// - `b`: divisor (must be non-zero)
///
/// ## Returns
/// - (`i64`): remainder with the sign of the divisor.
#[inline]
pub fn floor_mod_i64(a: i64, b: i64) -> i64 {
    debug_assert!(b != 0);
    // `wrapping_rem` keeps `i64::MIN % -1` from being treated as an overflow.
    let r = a.wrapping_rem(b);
    if (r > 0 && b < 0) || (r < 0 && b > 0) { r + b } else { r }
}

/// Floor modulo for floats (sign of divisor).
#[inline]
pub fn floor_mod_f64(a: f64, b: f64) -> f64 {
    debug_assert!(b != 0.0);
    let r = a % b;
    if (r > 0.0 && b < 0.0) || (r < 0.0 && b > 0.0) {
        r + b
    } else {
        r
    }
}

/// Convert a float to an int by truncating toward zero.
///
/// ## Notes
/// - NaN maps to `0`; values outside the `i64` range saturate.
#[inline]
pub fn truncate_f64(value: f64) -> i64 {
    value.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_div_rounds_down() {
        assert_eq!(floor_div_i64(6, 4), 1);
        assert_eq!(floor_div_i64(-6, 4), -2);
        assert_eq!(floor_div_i64(6, -4), -2);
        assert_eq!(floor_div_i64(-6, -4), 1);
        assert_eq!(floor_div_i64(8, 4), 2);
    }

    #[test]
    fn test_floor_mod_sign_of_divisor() {
        assert_eq!(floor_mod_i64(7, 3), 1);
        assert_eq!(floor_mod_i64(-7, 3), 2);
        assert_eq!(floor_mod_i64(7, -3), -2);
        assert_eq!(floor_mod_i64(i64::MIN, -1), 0);
        assert_eq!(floor_mod_f64(-1.5, 1.0), 0.5);
    }

    #[test]
    fn test_truncate_toward_zero() {
        assert_eq!(truncate_f64(1.9), 1);
        assert_eq!(truncate_f64(-1.9), -1);
        assert_eq!(truncate_f64(f64::NAN), 0);
    }
}
