//! Shared utility functions for dasha calculations.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r >= 0.0 {
        return r;
    }
    // A tiny negative angle can round up to exactly 360.0.
    let wrapped = r + 360.0;
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
