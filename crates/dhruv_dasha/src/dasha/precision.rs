//! Fixed-precision decimal arithmetic for dasha durations.
//!
//! Durations are carried as whole seconds; every conversion from a decimal
//! quantity rounds half-to-even so results are reproducible bit-for-bit.
//! Any period that exists at all is at least one second long.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::DashaError;

/// Year length for dasha calculations: 365.25 days.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

pub const SECONDS_PER_DAY: i64 = 86_400;

/// 365.25 * 86,400.
pub const SECONDS_PER_YEAR: i64 = 31_557_600;

/// Rounding rule applied everywhere a decimal becomes a whole number.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Decimal places kept for derived year and day figures.
pub const YEARS_DP: u32 = 12;

/// Decimal places kept when an f64 fraction enters decimal arithmetic.
pub const FRACTION_DP: u32 = 15;

/// Round to a whole number, half-to-even.
pub fn round_half_even(x: Decimal) -> Decimal {
    x.round_dp_with_strategy(0, ROUNDING)
}

/// Convert an f64 fraction into a decimal with [`FRACTION_DP`] places.
pub fn fraction_from_f64(x: f64) -> Result<Decimal, DashaError> {
    Decimal::from_f64(x)
        .map(|d| d.round_dp_with_strategy(FRACTION_DP, ROUNDING))
        .ok_or_else(|| DashaError::input(format!("cannot represent {x} as a decimal")))
}

fn to_whole_seconds(x: Decimal) -> Result<i64, DashaError> {
    round_half_even(x)
        .to_i64()
        .ok_or_else(|| DashaError::input(format!("{x} seconds is out of range")))
}

/// Years to whole seconds, minimum 1.
///
/// Negative input is rejected; zero years still yields the 1-second floor.
pub fn years_to_seconds(years: Decimal) -> Result<i64, DashaError> {
    if years.is_sign_negative() && !years.is_zero() {
        return Err(DashaError::input(format!("negative duration: {years} years")));
    }
    let secs = years
        .checked_mul(Decimal::from(SECONDS_PER_YEAR))
        .ok_or_else(|| DashaError::input(format!("{years} years overflows")))?;
    Ok(to_whole_seconds(secs)?.max(1))
}

/// Days to whole seconds, minimum 1.
pub fn days_to_seconds(days: Decimal) -> Result<i64, DashaError> {
    years_to_seconds(days / DAYS_PER_YEAR)
}

/// Whole seconds to years, rounded to [`YEARS_DP`] places.
pub fn seconds_to_years(secs: i64) -> Decimal {
    (Decimal::from(secs) / Decimal::from(SECONDS_PER_YEAR))
        .round_dp_with_strategy(YEARS_DP, ROUNDING)
}

/// Whole seconds to days, rounded to [`YEARS_DP`] places.
pub fn seconds_to_days(secs: i64) -> Decimal {
    (Decimal::from(secs) / Decimal::from(SECONDS_PER_DAY))
        .round_dp_with_strategy(YEARS_DP, ROUNDING)
}

/// `weight / total * whole_secs`, rounded half-to-even, minimum 1.
///
/// The product is formed before the division so an exact half in the true
/// quotient stays exact and rounds to even.
pub fn proportional_seconds(
    weight: Decimal,
    total: Decimal,
    whole_secs: i64,
) -> Result<i64, DashaError> {
    if total <= Decimal::ZERO {
        return Err(DashaError::config(format!("non-positive total weight {total}")));
    }
    let share = weight
        .checked_mul(Decimal::from(whole_secs))
        .and_then(|p| p.checked_div(total))
        .ok_or_else(|| DashaError::input(format!("{weight}/{total} of {whole_secs}s overflows")))?;
    Ok(to_whole_seconds(share)?.max(1))
}

/// `percent / 100 * whole_secs`, rounded half-to-even (no floor).
pub fn percent_of_seconds(percent: Decimal, whole_secs: i64) -> Result<i64, DashaError> {
    let value = percent
        .checked_mul(Decimal::from(whole_secs))
        .and_then(|p| p.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| DashaError::input(format!("{percent}% of {whole_secs}s overflows")))?;
    to_whole_seconds(value)
}

/// `instant + secs`, failing on calendar overflow.
pub fn add_seconds(instant: DateTime<Utc>, secs: i64) -> Result<DateTime<Utc>, DashaError> {
    TimeDelta::try_seconds(secs)
        .and_then(|d| instant.checked_add_signed(d))
        .ok_or_else(|| DashaError::input(format!("{instant} + {secs}s is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_year_matches_days() {
        assert_eq!(
            DAYS_PER_YEAR * Decimal::from(SECONDS_PER_DAY),
            Decimal::from(SECONDS_PER_YEAR)
        );
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_half_even(Decimal::new(25, 1)), Decimal::from(2));
        assert_eq!(round_half_even(Decimal::new(35, 1)), Decimal::from(4));
        assert_eq!(round_half_even(Decimal::new(-25, 1)), Decimal::from(-2));
    }

    #[test]
    fn years_round_trip() {
        let secs = years_to_seconds(Decimal::new(35, 1)).unwrap();
        assert_eq!(secs, 110_451_600);
        assert_eq!(seconds_to_years(secs), Decimal::new(35, 1));
    }

    #[test]
    fn minimum_one_second() {
        assert_eq!(years_to_seconds(Decimal::ZERO).unwrap(), 1);
        assert_eq!(years_to_seconds(Decimal::new(1, 12)).unwrap(), 1);
        assert_eq!(proportional_seconds(Decimal::from(7), Decimal::from(120), 3).unwrap(), 1);
    }

    #[test]
    fn negative_years_rejected() {
        assert!(years_to_seconds(Decimal::from(-1)).is_err());
    }

    #[test]
    fn proportional_exact_half_rounds_even() {
        // 1/4 of 10 = 2.5 -> 2; 3/4 of 10 = 7.5 -> 8
        assert_eq!(proportional_seconds(Decimal::ONE, Decimal::from(4), 10).unwrap(), 2);
        assert_eq!(proportional_seconds(Decimal::from(3), Decimal::from(4), 10).unwrap(), 8);
    }

    #[test]
    fn proportional_rejects_zero_total() {
        assert!(matches!(
            proportional_seconds(Decimal::ONE, Decimal::ZERO, 10),
            Err(DashaError::Configuration(_))
        ));
    }

    #[test]
    fn percent_of_seconds_rounds() {
        assert_eq!(percent_of_seconds(Decimal::from(5), 1000).unwrap(), 50);
        assert_eq!(percent_of_seconds(Decimal::new(5, 1), 3).unwrap(), 0);
    }

    #[test]
    fn days_to_seconds_whole_day() {
        assert_eq!(days_to_seconds(Decimal::ONE).unwrap(), SECONDS_PER_DAY);
    }
}
