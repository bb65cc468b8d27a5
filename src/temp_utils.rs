//! Utilities for converting between temperature and stored heat
//! in the units the reactor uses (Kelvin and Joules).

use crate::constants::TO_KELVIN;

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}

/// Heat (Joules) a body of the given capacity holds at `temp_k`.
///
/// # Arguments
/// - `temp_k`: Temperature in Kelvin
/// - `heat_capacity`: Heat capacity in J/K
pub fn heat_at_kelvin(temp_k: f64, heat_capacity: f64) -> f64 {
    temp_k * heat_capacity
}

/// Temperature in Kelvin of `heat` spread over `heat_capacity`; `fallback_k`
/// for an empty capacity
pub fn kelvin_from_heat(heat: f64, heat_capacity: f64, fallback_k: f64) -> f64 {
    if heat_capacity <= 0.0 {
        fallback_k
    } else {
        heat / heat_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_celsius_round_trip() {
        assert_abs_diff_eq!(celsius_to_kelvin(100.0), 373.15);
        assert_abs_diff_eq!(kelvin_to_celsius(1200.0), 926.85, epsilon = 1e-9);
    }

    #[test]
    fn test_heat_conversions() {
        assert_abs_diff_eq!(heat_at_kelvin(300.0, 27_000.0), 8_100_000.0);
        assert_abs_diff_eq!(kelvin_from_heat(8_100_000.0, 27_000.0, 0.0), 300.0);
        assert_eq!(kelvin_from_heat(5.0, 0.0, 300.0), 300.0);
    }
}
