//! Error types for dasha timeline calculations.

use thiserror::Error;

/// Errors from dasha timeline construction and queries.
///
/// Every variant is fatal to the single computation that produced it: the
/// engine never returns a partial timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DashaError {
    /// Weight table or engine settings are inconsistent (caller/config defect).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Caller-supplied value is outside its valid domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A computed partition broke one of its structural guarantees.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl DashaError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
