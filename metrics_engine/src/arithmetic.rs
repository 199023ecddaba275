//! Metrics Engine v1 - Arithmetic Primitives
//!
//! Rounding follows the dashboard convention: exact halves round toward
//! positive infinity (2.5 -> 3, -2.5 -> -2).

/// Round to the nearest integer, ties toward positive infinity.
/// Non-finite input is returned unchanged.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to one decimal place with the same tie rule.
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Round to a whole currency unit or head.
/// Saturates at the i64 range; NaN maps to 0.
pub fn to_whole(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Piecewise-linear ramp: `floor` at or below `min`, `ceiling` at or above
/// `optimal`, linear in between.
pub fn ramp(value: f64, min: f64, optimal: f64, floor: f64, ceiling: f64) -> f64 {
    if value >= optimal {
        return ceiling;
    }
    if value <= min {
        return floor;
    }
    floor + (ceiling - floor) * ((value - min) / (optimal - min))
}
