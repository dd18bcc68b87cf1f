//! Engine settings, loadable from TOML.
//!
//! ```toml
//! max_level = 6
//! cycle_count = 2
//!
//! [sandhi]
//! level_percent = [0.5, 1.0, 2.0, 3.0, 4.0, 5.0]
//! min_window_secs = 3600
//! max_window_secs = 2592000
//! depth = 2
//! ```
//!
//! Omitted keys take their defaults; the weight table defaults to Vimshottari.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dasha::precision::{SECONDS_PER_DAY, fraction_from_f64};
use crate::dasha::types::{DashaLevel, MAX_DASHA_LEVEL};
use crate::dasha::weights::WeightTable;
use crate::error::DashaError;

/// Maximum number of full cycles in a timeline.
pub const MAX_CYCLE_COUNT: u8 = 3;

/// Sandhi (transition window) sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandhiConfig {
    /// Window size as a percentage of the ending period, per level (1..=6).
    /// Must strictly increase with depth.
    pub level_percent: [f64; 6],
    /// Lower clamp on window length.
    pub min_window_secs: i64,
    /// Upper clamp on window length.
    pub max_window_secs: i64,
    /// Deepest level scanned for transitions.
    pub depth: u8,
}

impl Default for SandhiConfig {
    fn default() -> Self {
        Self {
            level_percent: [0.5, 1.0, 2.0, 3.0, 4.0, 5.0],
            min_window_secs: 3_600,
            max_window_secs: 30 * SECONDS_PER_DAY,
            depth: 2,
        }
    }
}

impl SandhiConfig {
    /// Window percentage for `level` as a decimal.
    pub fn percent_for(&self, level: DashaLevel) -> Result<Decimal, DashaError> {
        fraction_from_f64(self.level_percent[(level.depth() - 1) as usize])
    }

    pub fn validate(&self) -> Result<(), DashaError> {
        for (i, p) in self.level_percent.iter().enumerate() {
            if !p.is_finite() || *p < 0.0 || *p > 100.0 {
                return Err(DashaError::config(format!(
                    "sandhi percent for level {} must be within [0, 100], got {p}",
                    i + 1
                )));
            }
        }
        if self.level_percent.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DashaError::config(format!(
                "sandhi percentages must increase with depth, got {:?}",
                self.level_percent
            )));
        }
        if self.min_window_secs < 0 || self.min_window_secs > self.max_window_secs {
            return Err(DashaError::config(format!(
                "sandhi window clamp [{}, {}] is invalid",
                self.min_window_secs, self.max_window_secs
            )));
        }
        if !(1..=MAX_DASHA_LEVEL).contains(&self.depth) {
            return Err(DashaError::config(format!(
                "sandhi depth must be 1..={MAX_DASHA_LEVEL}, got {}",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashaConfig {
    /// Deepest level resolved by active-path queries (1..=6).
    pub max_level: u8,
    /// Full 120-year cycles generated at the top level.
    pub cycle_count: u8,
    pub weights: WeightTable,
    pub sandhi: SandhiConfig,
}

impl Default for DashaConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_DASHA_LEVEL,
            cycle_count: 2,
            weights: WeightTable::vimshottari(),
            sandhi: SandhiConfig::default(),
        }
    }
}

impl DashaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, DashaError> {
        let config: Self =
            toml::from_str(s).map_err(|e| DashaError::config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DashaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashaError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), DashaError> {
        if !(1..=MAX_DASHA_LEVEL).contains(&self.max_level) {
            return Err(DashaError::config(format!(
                "max_level must be 1..={MAX_DASHA_LEVEL}, got {}",
                self.max_level
            )));
        }
        if !(1..=MAX_CYCLE_COUNT).contains(&self.cycle_count) {
            return Err(DashaError::config(format!(
                "cycle_count must be 1..={MAX_CYCLE_COUNT}, got {}",
                self.cycle_count
            )));
        }
        self.weights.validate()?;
        self.sandhi.validate()
    }
}
