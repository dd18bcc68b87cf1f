//! Proportional sub-period generation.
//!
//! A parent period of `D` seconds is split among the nine grahas, starting
//! from the parent's own graha: child `i` gets `weight_i / total * D` seconds,
//! rounded half-to-even with a 1-second floor. Rounding drift is absorbed by
//! the last child, whose end is snapped to the parent's end, so the children
//! always tile the parent exactly.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::error::DashaError;
use crate::graha::Graha;

use super::precision::{self, add_seconds};
use super::sequence::cycle_from;
use super::types::{DashaLevel, PeriodNode};
use super::weights::WeightTable;

/// Build a period from its start and length.
pub fn period_from_start(
    graha: Graha,
    level: DashaLevel,
    order: u16,
    start: DateTime<Utc>,
    duration_secs: i64,
) -> Result<PeriodNode, DashaError> {
    if duration_secs < 1 {
        return Err(DashaError::invariant(format!(
            "{} {graha} #{order} has non-positive duration {duration_secs}s",
            level.name()
        )));
    }
    Ok(PeriodNode {
        graha,
        level,
        order,
        start,
        end: add_seconds(start, duration_secs)?,
        duration_secs,
        duration_years: precision::seconds_to_years(duration_secs),
    })
}

/// Children of `parent`, starting from the parent's own graha.
///
/// A dehadasha (deepest level) has no children and yields an empty vector.
pub fn subdivide(parent: &PeriodNode, table: &WeightTable) -> Result<Vec<PeriodNode>, DashaError> {
    subdivide_from(parent, None, table)
}

/// Children of `parent`, starting from `start_override` when given.
pub fn subdivide_from(
    parent: &PeriodNode,
    start_override: Option<Graha>,
    table: &WeightTable,
) -> Result<Vec<PeriodNode>, DashaError> {
    let Some(child_level) = parent.level.child_level() else {
        return Ok(Vec::new());
    };
    let seq = cycle_from(table, start_override.unwrap_or(parent.graha))?;
    let n = seq.len() as i64;
    if parent.duration_secs < n {
        return Err(DashaError::invariant(format!(
            "{} {} lasts {}s, too short for {n} sub-periods",
            parent.level.name(),
            parent.graha,
            parent.duration_secs
        )));
    }

    let total = table.total_years();
    let mut children = Vec::with_capacity(seq.len());
    let mut cursor = parent.start;
    let mut remaining = parent.duration_secs;

    for (i, &(graha, weight)) in seq.iter().enumerate() {
        let left_after = n - 1 - i as i64;
        let order = (i as u16) + 1;
        if left_after == 0 {
            // Last child absorbs the rounding remainder and ends exactly on the parent.
            children.push(PeriodNode {
                graha,
                level: child_level,
                order,
                start: cursor,
                end: parent.end,
                duration_secs: remaining,
                duration_years: precision::seconds_to_years(remaining),
            });
            break;
        }
        let secs = precision::proportional_seconds(weight, total, parent.duration_secs)?
            .min(remaining - left_after);
        let child = period_from_start(graha, child_level, order, cursor, secs)?;
        cursor = child.end;
        remaining -= secs;
        children.push(child);
    }

    verify_partition(parent, &children)?;
    trace!(
        parent = %parent.graha,
        level = parent.level.name(),
        secs = parent.duration_secs,
        "subdivided period"
    );
    Ok(children)
}

/// Check that `children` tile `parent` exactly.
pub fn verify_partition(parent: &PeriodNode, children: &[PeriodNode]) -> Result<(), DashaError> {
    let (Some(first), Some(last)) = (children.first(), children.last()) else {
        return Err(DashaError::invariant("partition has no children"));
    };
    if first.start != parent.start || last.end != parent.end {
        return Err(DashaError::invariant(format!(
            "children span {}..{}, parent spans {}..{}",
            first.start, last.end, parent.start, parent.end
        )));
    }
    let mut sum = 0i64;
    for (i, c) in children.iter().enumerate() {
        if c.duration_secs < 1 || (c.end - c.start).num_seconds() != c.duration_secs {
            return Err(DashaError::invariant(format!(
                "child {} ({}) has inconsistent duration {}s",
                i + 1,
                c.graha,
                c.duration_secs
            )));
        }
        if children.get(i + 1).is_some_and(|next| c.end != next.start) {
            return Err(DashaError::invariant(format!(
                "gap between child {} and {}",
                i + 1,
                i + 2
            )));
        }
        sum += c.duration_secs;
    }
    if sum != parent.duration_secs {
        return Err(DashaError::invariant(format!(
            "children total {sum}s, parent is {}s",
            parent.duration_secs
        )));
    }
    Ok(())
}
