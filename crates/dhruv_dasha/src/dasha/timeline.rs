//! Mahadasha timeline from birth inputs.
//!
//! The first mahadasha carries only the birth balance; every later one runs
//! its graha's full weight. `cycle_count` full passes through the sequence
//! are generated (two passes = 18 periods, well past any lifespan).

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::DashaConfig;
use crate::error::DashaError;
use crate::graha::Graha;
use crate::nakshatra::{NakshatraInfo, nakshatra_from_longitude};

use super::balance::{BirthBalance, balance_from_fraction, balance_from_position};
use super::precision;
use super::query::find_active_period;
use super::sequence::rotated_sequence;
use super::subperiod::period_from_start;
use super::types::{DashaLevel, PeriodNode};
use super::weights::WeightTable;

/// Hashable identity of the inputs that fully determine a timeline.
///
/// Intended as a memoization key for callers that cache whole timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineKey {
    /// Birth instant, nanoseconds since the Unix epoch (UTC).
    pub birth_nanos: i64,
    /// Civil offset of the birth instant, seconds east of UTC.
    pub offset_secs: i32,
    /// Bit pattern of the Moon's sidereal longitude.
    pub moon_lon_bits: u64,
}

impl TimelineKey {
    pub fn new(birth: DateTime<FixedOffset>, moon_sidereal_lon: f64) -> Result<Self, DashaError> {
        let birth_nanos = birth
            .timestamp_nanos_opt()
            .ok_or_else(|| DashaError::input(format!("birth {birth} is out of range")))?;
        Ok(Self {
            birth_nanos,
            offset_secs: birth.offset().local_minus_utc(),
            moon_lon_bits: moon_sidereal_lon.to_bits(),
        })
    }
}

/// Mahadasha sequence for one birth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    /// Birth instant with its civil offset.
    pub birth: DateTime<FixedOffset>,
    /// Birth nakshatra, when the timeline came from a longitude.
    pub nakshatra: Option<NakshatraInfo>,
    /// Balance of the first mahadasha.
    pub balance: BirthBalance,
    /// Contiguous level-1 periods in order.
    pub periods: Vec<PeriodNode>,
}

impl Timeline {
    /// Start of the first period (the birth instant in UTC).
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.periods.first().map(|p| p.start)
    }

    /// End of the last period.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.periods.last().map(|p| p.end)
    }

    /// Mahadasha containing `instant`.
    pub fn period_at(&self, instant: DateTime<Utc>) -> Option<&PeriodNode> {
        find_active_period(&self.periods, instant).map(|i| &self.periods[i])
    }
}

/// Mahadashas starting at `birth` with the given balance.
pub fn mahadashas(
    birth: DateTime<Utc>,
    balance: &BirthBalance,
    cycle_count: u8,
    table: &WeightTable,
) -> Result<Vec<PeriodNode>, DashaError> {
    let total_entries = table.len() * cycle_count as usize;
    let seq = rotated_sequence(table, balance.graha, total_entries)?;
    let mut periods = Vec::with_capacity(total_entries);
    let mut cursor = birth;

    for (i, &(graha, years)) in seq.iter().enumerate() {
        let (secs, years) = if i == 0 {
            (balance.balance_secs, balance.balance_years)
        } else {
            (precision::years_to_seconds(years)?, years)
        };
        let mut period =
            period_from_start(graha, DashaLevel::Mahadasha, (i as u16) + 1, cursor, secs)?;
        // Level-1 years are authoritative; the seconds are derived from them.
        period.duration_years = years;
        cursor = period.end;
        periods.push(period);
    }

    Ok(periods)
}

/// Timeline from the Moon's sidereal longitude at birth.
pub fn compute_timeline(
    birth: DateTime<FixedOffset>,
    moon_sidereal_lon: f64,
    config: &DashaConfig,
) -> Result<Timeline, DashaError> {
    let info = nakshatra_from_longitude(moon_sidereal_lon)?;
    let balance = balance_from_position(info.degrees_in_nakshatra, info.lord, &config.weights)?;
    debug!(
        nakshatra = info.nakshatra.name(),
        lord = %info.lord,
        elapsed = %balance.elapsed_fraction,
        balance_secs = balance.balance_secs,
        "computed birth balance"
    );
    build(birth, Some(info), balance, config)
}

/// Timeline from an explicit anchor fraction and starting graha.
pub fn compute_timeline_from_anchor(
    birth: DateTime<FixedOffset>,
    anchor_fraction: f64,
    start: Graha,
    config: &DashaConfig,
) -> Result<Timeline, DashaError> {
    let balance = balance_from_fraction(anchor_fraction, start, &config.weights)?;
    build(birth, None, balance, config)
}

fn build(
    birth: DateTime<FixedOffset>,
    nakshatra: Option<NakshatraInfo>,
    balance: BirthBalance,
    config: &DashaConfig,
) -> Result<Timeline, DashaError> {
    config.validate()?;
    let periods = mahadashas(
        birth.with_timezone(&Utc),
        &balance,
        config.cycle_count,
        &config.weights,
    )?;
    debug!(
        count = periods.len(),
        first = %balance.graha,
        "built mahadasha timeline"
    );
    Ok(Timeline {
        birth,
        nakshatra,
        balance,
        periods,
    })
}
