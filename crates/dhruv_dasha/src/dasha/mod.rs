//! Vimshottari dasha (planetary period) calculations.
//!
//! The 120-year Vimshottari cycle is split into nine mahadashas, each of
//! which is split again in the same proportions, down to six levels
//! (Mahadasha through Dehadasha).
//!
//! Computation tiers:
//! - Timeline: birth balance plus the level-1 periods, built eagerly
//! - Subdivision: the nine children of any single period
//! - Active path: one branch drilled down to the requested depth
//! - Hierarchy: complete levels, capped at `MAX_PERIODS_PER_LEVEL`
//! - Sandhi: junction windows around sibling boundaries within a horizon

pub mod balance;
pub mod precision;
pub mod query;
pub mod sandhi;
pub mod sequence;
pub mod subperiod;
pub mod timeline;
pub mod types;
pub mod weights;

pub use balance::{BirthBalance, balance_from_fraction, balance_from_position, birth_balance};
pub use precision::{DAYS_PER_YEAR, SECONDS_PER_DAY, SECONDS_PER_YEAR};
pub use query::{active_path, complete_level, dasha_hierarchy, find_active_period};
pub use sandhi::{sibling_transitions, transition_window, upcoming_transitions, window_seconds};
pub use sequence::{cycle_from, rotated_sequence};
pub use subperiod::{period_from_start, subdivide, subdivide_from, verify_partition};
pub use timeline::{
    Timeline, TimelineKey, compute_timeline, compute_timeline_from_anchor, mahadashas,
};
pub use types::{
    ALL_DASHA_LEVELS, ActivePath, DashaHierarchy, DashaLevel, MAX_DASHA_LEVEL,
    MAX_PERIODS_PER_LEVEL, PeriodNode, TransitionWindow,
};
pub use weights::{VIMSHOTTARI_CYCLE_YEARS, WeightEntry, WeightLookup, WeightTable};
