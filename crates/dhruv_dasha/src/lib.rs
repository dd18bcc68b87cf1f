//! Vimshottari dasha timeline engine.
//!
//! This crate provides:
//! - Birth balance from the Moon's sidereal longitude
//! - Six-level proportional subdivision with exact whole-second partitions
//! - Active-path queries and sandhi (transition window) detection
//!
//! All computations are pure: identical inputs give identical periods, and
//! "now" is always supplied by the caller.

pub mod config;
pub mod dasha;
pub mod error;
pub mod graha;
pub mod nakshatra;
pub mod util;

pub use config::{DashaConfig, SandhiConfig};
pub use error::DashaError;
pub use graha::{ALL_GRAHAS, Graha};
pub use nakshatra::{
    ALL_NAKSHATRAS_27, NAKSHATRA_SPAN_27, Nakshatra, NakshatraInfo, nakshatra_from_longitude,
};
