//! Sandhi (junction) windows between adjacent sibling periods.
//!
//! The window around a boundary is a level-dependent percentage of the ending
//! period, clamped to `[min_window_secs, max_window_secs]`. Deeper levels use
//! larger percentages.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{DashaConfig, SandhiConfig};
use crate::error::DashaError;

use super::precision::{self, SECONDS_PER_DAY, add_seconds};
use super::subperiod::subdivide;
use super::timeline::Timeline;
use super::types::{DashaLevel, MAX_PERIODS_PER_LEVEL, PeriodNode, TransitionWindow};

/// Window length for a period of `period_secs` ending at `level`.
pub fn window_seconds(
    level: DashaLevel,
    period_secs: i64,
    config: &SandhiConfig,
) -> Result<i64, DashaError> {
    let raw = precision::percent_of_seconds(config.percent_for(level)?, period_secs)?;
    Ok(raw.clamp(config.min_window_secs, config.max_window_secs))
}

/// Window centred on the boundary `current.end == next.start`.
pub fn transition_window(
    current: &PeriodNode,
    next: &PeriodNode,
    config: &SandhiConfig,
) -> Result<TransitionWindow, DashaError> {
    let window_secs = window_seconds(current.level, current.duration_secs, config)?;
    let before = window_secs / 2;
    Ok(TransitionWindow {
        from: current.graha,
        to: next.graha,
        level: current.level,
        transition: current.end,
        window_start: add_seconds(current.end, -before)?,
        window_end: add_seconds(current.end, window_secs - before)?,
        window_secs,
    })
}

/// Windows for every adjacent pair in an ordered sibling list.
///
/// Pairs that do not share a boundary are skipped.
pub fn sibling_transitions(
    siblings: &[PeriodNode],
    config: &SandhiConfig,
) -> Result<Vec<TransitionWindow>, DashaError> {
    siblings
        .windows(2)
        .filter(|w| w[0].end == w[1].start)
        .map(|w| transition_window(&w[0], &w[1], config))
        .collect()
}

/// Transitions whose boundary falls within `lookahead_days` after `from`,
/// scanning levels 1..=`config.sandhi.depth`, ascending by instant.
pub fn upcoming_transitions(
    timeline: &Timeline,
    from: DateTime<Utc>,
    lookahead_days: i64,
    config: &DashaConfig,
) -> Result<Vec<TransitionWindow>, DashaError> {
    if lookahead_days < 0 {
        return Err(DashaError::input(format!(
            "lookahead must be non-negative, got {lookahead_days} days"
        )));
    }
    let lookahead_secs = lookahead_days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
        DashaError::input(format!("lookahead of {lookahead_days} days overflows"))
    })?;
    let horizon = add_seconds(from, lookahead_secs)?;
    let in_horizon = |w: &TransitionWindow| from <= w.transition && w.transition <= horizon;
    let overlaps = |p: &PeriodNode| p.end >= from && p.start <= horizon;

    let table = &config.weights;
    let mut found: Vec<TransitionWindow> = sibling_transitions(&timeline.periods, &config.sandhi)?
        .into_iter()
        .filter(in_horizon)
        .collect();

    let mut frontier: Vec<PeriodNode> = timeline.periods.iter().copied().filter(overlaps).collect();
    for _ in 1..config.sandhi.depth {
        let estimated = frontier.len() * table.len();
        if estimated > MAX_PERIODS_PER_LEVEL {
            return Err(DashaError::input(format!(
                "sandhi scan of {estimated} periods exceeds cap of {MAX_PERIODS_PER_LEVEL}"
            )));
        }
        let mut next_frontier = Vec::with_capacity(estimated);
        for parent in &frontier {
            if parent.duration_secs < table.len() as i64 {
                continue;
            }
            let children = subdivide(parent, table)?;
            found.extend(
                sibling_transitions(&children, &config.sandhi)?
                    .into_iter()
                    .filter(in_horizon),
            );
            next_frontier.extend(children.into_iter().filter(overlaps));
        }
        frontier = next_frontier;
    }

    found.sort_by_key(|w| (w.transition, w.level));
    debug!(
        count = found.len(),
        lookahead_days,
        depth = config.sandhi.depth,
        "collected upcoming transitions"
    );
    Ok(found)
}
