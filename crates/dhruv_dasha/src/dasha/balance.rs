//! Birth balance of the first mahadasha.
//!
//! The Moon's progress through its nakshatra at birth is the fraction of the
//! nakshatra lord's mahadasha already "used up" before birth. Only the rest
//! of that period remains in the native's timeline.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::DashaError;
use crate::graha::Graha;
use crate::nakshatra::{NAKSHATRA_BOUNDARY_EPS_DEG, NAKSHATRA_SPAN_27, nakshatra_from_longitude};

use super::precision::{self, fraction_from_f64};
use super::weights::WeightTable;

/// Starting graha and remaining length of the first mahadasha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthBalance {
    /// Graha ruling the first mahadasha.
    pub graha: Graha,
    /// Fraction of the graha's full period elapsed before birth, [0, 1].
    pub elapsed_fraction: Decimal,
    /// `1 - elapsed_fraction`.
    pub remaining_fraction: Decimal,
    /// Remaining years of the first mahadasha.
    pub balance_years: Decimal,
    /// Remaining whole seconds (>= 1).
    pub balance_secs: i64,
}

/// Balance from an elapsed fraction of `graha`'s full period.
///
/// The fraction is clamped to [0, 1]; NaN and infinities are rejected.
pub fn balance_from_fraction(
    elapsed_fraction: f64,
    graha: Graha,
    table: &WeightTable,
) -> Result<BirthBalance, DashaError> {
    if !elapsed_fraction.is_finite() {
        return Err(DashaError::input(format!(
            "anchor fraction must be finite, got {elapsed_fraction}"
        )));
    }
    let weight = table.weight(graha)?;
    let elapsed = fraction_from_f64(elapsed_fraction.clamp(0.0, 1.0))?;
    let remaining = Decimal::ONE - elapsed;
    let balance_years = remaining * weight;
    Ok(BirthBalance {
        graha,
        elapsed_fraction: elapsed,
        remaining_fraction: remaining,
        balance_years,
        balance_secs: precision::years_to_seconds(balance_years)?,
    })
}

/// Balance from a position `position_deg` within a nakshatra ruled by `graha`.
///
/// The position is reduced modulo the nakshatra span before use. A position
/// within [`NAKSHATRA_BOUNDARY_EPS_DEG`] below a boundary counts as the start
/// of the next segment, so rounding noise never wraps to a spent period.
pub fn balance_from_position(
    position_deg: f64,
    graha: Graha,
    table: &WeightTable,
) -> Result<BirthBalance, DashaError> {
    if !position_deg.is_finite() {
        return Err(DashaError::input(format!(
            "position must be finite, got {position_deg}"
        )));
    }
    let mut p = position_deg.rem_euclid(NAKSHATRA_SPAN_27);
    if NAKSHATRA_SPAN_27 - p < NAKSHATRA_BOUNDARY_EPS_DEG {
        p = 0.0;
    }
    if !(0.0..NAKSHATRA_SPAN_27).contains(&p) {
        return Err(DashaError::input(format!(
            "position {p} outside [0, {NAKSHATRA_SPAN_27})"
        )));
    }
    balance_from_fraction(p / NAKSHATRA_SPAN_27, graha, table)
}

/// Balance from the Moon's sidereal longitude at birth.
pub fn birth_balance(
    moon_sidereal_lon: f64,
    table: &WeightTable,
) -> Result<BirthBalance, DashaError> {
    let info = nakshatra_from_longitude(moon_sidereal_lon)?;
    balance_from_position(info.degrees_in_nakshatra, info.lord, table)
}
