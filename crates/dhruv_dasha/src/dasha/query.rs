//! Point-in-time queries over a dasha timeline.
//!
//! `active_path` drills down one branch at a time: at each level only the
//! children of the active period are generated, so a six-level query costs
//! O(depth * 9) instead of materializing 9^depth periods.

use chrono::{DateTime, Utc};

use crate::error::DashaError;

use super::subperiod::subdivide;
use super::timeline::Timeline;
use super::types::{ActivePath, DashaHierarchy, MAX_DASHA_LEVEL, MAX_PERIODS_PER_LEVEL, PeriodNode};
use super::weights::WeightTable;

/// Index of the earliest period whose inclusive `[start, end]` contains
/// `instant`. `periods` must be sorted and contiguous.
///
/// On a shared boundary the earlier period wins.
pub fn find_active_period(periods: &[PeriodNode], instant: DateTime<Utc>) -> Option<usize> {
    let idx = periods.partition_point(|p| p.end < instant);
    periods
        .get(idx)
        .filter(|p| p.start <= instant)
        .map(|_| idx)
}

/// Active period at every level from the mahadasha down to `max_level`.
///
/// The path stops early when no child contains the instant or a period is
/// too short to split; it is empty outside the timeline.
pub fn active_path(
    timeline: &Timeline,
    instant: DateTime<Utc>,
    max_level: u8,
    table: &WeightTable,
) -> Result<ActivePath, DashaError> {
    let max_level = max_level.min(MAX_DASHA_LEVEL);
    let mut periods = Vec::with_capacity(max_level as usize);

    let Some(idx) = find_active_period(&timeline.periods, instant) else {
        return Ok(ActivePath {
            query: instant,
            periods,
        });
    };
    let mut current = timeline.periods[idx];
    periods.push(current);

    while current.level.depth() < max_level && current.duration_secs >= table.len() as i64 {
        let children = subdivide(&current, table)?;
        match find_active_period(&children, instant) {
            Some(i) => {
                current = children[i];
                periods.push(current);
            }
            None => break,
        }
    }

    Ok(ActivePath {
        query: instant,
        periods,
    })
}

/// All children of every period in `parent_level`, in order.
pub fn complete_level(
    parent_level: &[PeriodNode],
    table: &WeightTable,
) -> Result<Vec<PeriodNode>, DashaError> {
    let estimated = parent_level.len() * table.len();
    if estimated > MAX_PERIODS_PER_LEVEL {
        return Err(DashaError::input(format!(
            "level of {estimated} periods exceeds cap of {MAX_PERIODS_PER_LEVEL}"
        )));
    }
    let mut result = Vec::with_capacity(estimated);
    for parent in parent_level {
        result.extend(subdivide(parent, table)?);
    }
    Ok(result)
}

/// Materialize levels 1..=`max_level` below a timeline.
pub fn dasha_hierarchy(
    timeline: &Timeline,
    max_level: u8,
    table: &WeightTable,
) -> Result<DashaHierarchy, DashaError> {
    let max_level = max_level.clamp(1, MAX_DASHA_LEVEL);
    let mut levels = vec![timeline.periods.clone()];
    for _ in 1..max_level {
        let next = match levels.last() {
            Some(parent) => complete_level(parent, table)?,
            None => break,
        };
        if next.is_empty() {
            break;
        }
        levels.push(next);
    }
    Ok(DashaHierarchy {
        birth: timeline.birth.with_timezone(&Utc),
        levels,
    })
}
