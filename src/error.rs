//! Engine error taxonomy.
//!
//! All public engine operations validate their inputs up front and return one
//! of these variants before any computation proceeds. Empty outcomes (no
//! conflicts, no slots, empty history) are ordinary values, never errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Validation failures raised at the boundary of public engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The supplied zone name does not resolve to a known IANA time zone.
    #[error("unrecognized time zone: {0}")]
    InvalidTimeZone(String),

    /// An interval whose end does not lie strictly after its start.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Scoring weights that do not sum to 1.0 within tolerance.
    #[error("scoring weights must sum to 1.0, got {0}")]
    InvalidWeights(f64),

    /// An operation requiring at least one participant received none.
    #[error("operation requires at least one participant")]
    EmptyParticipantSet,
}

/// Tolerance applied when checking that weight sets sum to 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;
