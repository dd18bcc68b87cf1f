//! Core types for dasha timeline calculations.
//!
//! A dasha timeline is a six-level hierarchy: each period is split among the
//! nine grahas in proportion to their Vimshottari weights, and each of those
//! children is split again, down to the dehadasha.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::graha::Graha;

use super::precision;

/// Deepest supported level (dehadasha).
pub const MAX_DASHA_LEVEL: u8 = 6;

/// Hard cap on periods per materialized level.
pub const MAX_PERIODS_PER_LEVEL: usize = 100_000;

/// Six hierarchical dasha levels, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DashaLevel {
    Mahadasha = 1,
    Antardasha = 2,
    Pratyantardasha = 3,
    Sookshmadasha = 4,
    Pranadasha = 5,
    Dehadasha = 6,
}

/// All levels, shallowest first.
pub const ALL_DASHA_LEVELS: [DashaLevel; 6] = [
    DashaLevel::Mahadasha,
    DashaLevel::Antardasha,
    DashaLevel::Pratyantardasha,
    DashaLevel::Sookshmadasha,
    DashaLevel::Pranadasha,
    DashaLevel::Dehadasha,
];

impl DashaLevel {
    /// Create from the 1-based level number.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1..=6 => Some(ALL_DASHA_LEVELS[(v - 1) as usize]),
            _ => None,
        }
    }

    /// 1-based level number.
    pub const fn depth(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mahadasha => "Mahadasha",
            Self::Antardasha => "Antardasha",
            Self::Pratyantardasha => "Pratyantardasha",
            Self::Sookshmadasha => "Sookshmadasha",
            Self::Pranadasha => "Pranadasha",
            Self::Dehadasha => "Dehadasha",
        }
    }

    /// Next deeper level, if any.
    pub const fn child_level(self) -> Option<Self> {
        match self {
            Self::Mahadasha => Some(Self::Antardasha),
            Self::Antardasha => Some(Self::Pratyantardasha),
            Self::Pratyantardasha => Some(Self::Sookshmadasha),
            Self::Sookshmadasha => Some(Self::Pranadasha),
            Self::Pranadasha => Some(Self::Dehadasha),
            Self::Dehadasha => None,
        }
    }
}

/// A single dasha period at any level.
///
/// `end - start` is always exactly `duration_secs` whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodNode {
    /// The graha ruling this period.
    pub graha: Graha,
    /// Hierarchical level.
    pub level: DashaLevel,
    /// 1-indexed position among siblings (or in the timeline for level 1).
    pub order: u16,
    /// Start instant, inclusive.
    pub start: DateTime<Utc>,
    /// End instant, inclusive for queries.
    pub end: DateTime<Utc>,
    /// Exact length in seconds (>= 1).
    pub duration_secs: i64,
    /// Length in years of 365.25 days.
    pub duration_years: Decimal,
}

impl PeriodNode {
    /// Duration of the period in days.
    pub fn duration_days(&self) -> Decimal {
        precision::seconds_to_days(self.duration_secs)
    }

    /// True when `instant` lies within `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Alias of [`contains`](Self::contains) for "current period" views.
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.contains(instant)
    }

    /// Percentage of the period elapsed at `instant`, clamped to [0, 100].
    pub fn progress_percent_at(&self, instant: DateTime<Utc>) -> f64 {
        let elapsed = (instant - self.start)
            .num_seconds()
            .clamp(0, self.duration_secs);
        elapsed as f64 / self.duration_secs as f64 * 100.0
    }
}

/// Active periods at one instant, one per resolved level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePath {
    /// The queried instant.
    pub query: DateTime<Utc>,
    /// periods[0] = active mahadasha, [1] = active antardasha, ...
    pub periods: Vec<PeriodNode>,
}

impl ActivePath {
    /// Ruling grahas from the mahadasha downwards.
    pub fn grahas(&self) -> Vec<Graha> {
        self.periods.iter().map(|p| p.graha).collect()
    }

    /// Active period at a specific level, if the path reached it.
    pub fn at_level(&self, level: DashaLevel) -> Option<&PeriodNode> {
        self.periods.get((level.depth() - 1) as usize)
    }

    /// Deepest resolved period.
    pub fn deepest(&self) -> Option<&PeriodNode> {
        self.periods.last()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// A sandhi (junction) window around the boundary of two sibling periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionWindow {
    /// Graha of the ending period.
    pub from: Graha,
    /// Graha of the beginning period.
    pub to: Graha,
    /// Level of both siblings.
    pub level: DashaLevel,
    /// Boundary instant (end of `from`, start of `to`).
    pub transition: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// `window_end - window_start` in seconds.
    pub window_secs: i64,
}

/// Fully materialized levels below a timeline.
#[derive(Debug, Clone, Serialize)]
pub struct DashaHierarchy {
    /// Birth instant (UTC).
    pub birth: DateTime<Utc>,
    /// levels[0] = mahadashas, levels[1] = antardashas, ...
    pub levels: Vec<Vec<PeriodNode>>,
}
