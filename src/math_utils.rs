/// Numeric helpers shared by the reactor ops.
///
/// Resource units are integral while rates are fractional; these helpers are the
/// only place where one is turned into the other.

/// Convert a computed quantity into a whole amount bounded to `[0, stored]`
///
/// NaN and negative inputs yield 0; values past `u64::MAX` saturate before
/// the bound is applied.
///
/// # Examples
/// ```
/// use fission_core::math_utils::clamp_to_amount;
///
/// assert_eq!(clamp_to_amount(12.9, 100), 12);
/// assert_eq!(clamp_to_amount(512.0, 100), 100);
/// assert_eq!(clamp_to_amount(f64::NAN, 100), 0);
/// assert_eq!(clamp_to_amount(-3.0, 100), 0);
/// ```
pub fn clamp_to_amount(value: f64, stored: u64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX for large floats
    let whole = value as u64;
    whole.min(stored)
}

/// Split a non-negative quantity into its whole part and fractional carry
///
/// The carry is always in `[0, 1)`.
///
/// # Examples
/// ```
/// use fission_core::math_utils::split_whole;
///
/// assert_eq!(split_whole(7.25), (7, 0.25));
/// assert_eq!(split_whole(0.5), (0, 0.5));
/// ```
pub fn split_whole(value: f64) -> (u64, f64) {
    if value.is_nan() || value <= 0.0 {
        return (0, 0.0);
    }
    let whole = value.floor();
    (whole as u64, value - whole)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// `part / whole` as a fraction in `[0, 1]`; 0 for an empty whole
pub fn fraction_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).min(1.0)
    }
}
