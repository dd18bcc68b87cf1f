//! Graha weight table for the Vimshottari cycle.
//!
//! Nine grahas in dasha order, each with its full mahadasha length in years.
//! The weights must total the declared cycle length (120 years).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DashaError;
use crate::graha::Graha;

/// Vimshottari cycle length in years.
pub const VIMSHOTTARI_CYCLE_YEARS: i64 = 120;

/// Vimshottari order with full periods in years.
const VIMSHOTTARI_WEIGHTS: [(Graha, i64); 9] = [
    (Graha::Ketu, 7),
    (Graha::Shukra, 20),
    (Graha::Surya, 6),
    (Graha::Chandra, 10),
    (Graha::Mangal, 7),
    (Graha::Rahu, 18),
    (Graha::Guru, 16),
    (Graha::Shani, 19),
    (Graha::Buddh, 17),
];

/// One graha and its full-cycle weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub graha: Graha,
    pub years: Decimal,
}

/// Result of looking a graha up in a [`WeightTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightLookup {
    Found {
        position: usize,
        years: Decimal,
    },
    NotFound,
}

/// Ordered graha weights. Construct through [`WeightTable::new`] (or
/// deserialize and call [`validate`](WeightTable::validate)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
    cycle_years: Decimal,
}

impl WeightTable {
    /// Build and validate a table.
    pub fn new(entries: Vec<WeightEntry>, cycle_years: Decimal) -> Result<Self, DashaError> {
        let table = Self {
            entries,
            cycle_years,
        };
        table.validate()?;
        Ok(table)
    }

    /// The canonical Vimshottari table.
    pub fn vimshottari() -> Self {
        Self {
            entries: VIMSHOTTARI_WEIGHTS
                .iter()
                .map(|&(graha, years)| WeightEntry {
                    graha,
                    years: Decimal::from(years),
                })
                .collect(),
            cycle_years: Decimal::from(VIMSHOTTARI_CYCLE_YEARS),
        }
    }

    /// Check weights are positive, grahas unique, and the total matches the cycle.
    pub fn validate(&self) -> Result<(), DashaError> {
        if self.entries.is_empty() {
            return Err(DashaError::config("weight table is empty"));
        }
        for (i, e) in self.entries.iter().enumerate() {
            if e.years <= Decimal::ZERO {
                return Err(DashaError::config(format!(
                    "weight for {} must be positive, got {}",
                    e.graha, e.years
                )));
            }
            if self.entries[..i].iter().any(|prev| prev.graha == e.graha) {
                return Err(DashaError::config(format!(
                    "{} appears twice in weight table",
                    e.graha
                )));
            }
        }
        let total = self.total_years();
        if total != self.cycle_years {
            return Err(DashaError::config(format!(
                "weights total {total} years, cycle declares {}",
                self.cycle_years
            )));
        }
        Ok(())
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared cycle length in years.
    pub fn cycle_years(&self) -> Decimal {
        self.cycle_years
    }

    /// Sum of all weights.
    pub fn total_years(&self) -> Decimal {
        self.entries.iter().map(|e| e.years).sum()
    }

    pub fn lookup(&self, graha: Graha) -> WeightLookup {
        match self.entries.iter().position(|e| e.graha == graha) {
            Some(position) => WeightLookup::Found {
                position,
                years: self.entries[position].years,
            },
            None => WeightLookup::NotFound,
        }
    }

    /// Full-cycle weight of `graha` in years.
    pub fn weight(&self, graha: Graha) -> Result<Decimal, DashaError> {
        match self.lookup(graha) {
            WeightLookup::Found { years, .. } => Ok(years),
            WeightLookup::NotFound => Err(DashaError::config(format!(
                "{graha} has no entry in the weight table"
            ))),
        }
    }

    /// Position of `graha` in dasha order.
    pub fn position(&self, graha: Graha) -> Result<usize, DashaError> {
        match self.lookup(graha) {
            WeightLookup::Found { position, .. } => Ok(position),
            WeightLookup::NotFound => Err(DashaError::config(format!(
                "{graha} has no entry in the weight table"
            ))),
        }
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::vimshottari()
    }
}
