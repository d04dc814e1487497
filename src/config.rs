//! Engine configuration.
//!
//! Every tunable the engine consumes (slot-search granularity and weights,
//! overload thresholds, productivity windows, workload baseline) is passed in
//! explicitly through these structs. The engine never reads environment
//! variables or files itself; callers that keep their tuning in a TOML file
//! can load it with [`EngineConfig::from_toml_str`].

use crate::error::{EngineError, WEIGHT_TOLERANCE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Weights for the three slot-scoring factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotWeights {
    /// Weight of the availability-margin factor.
    pub availability: f64,
    /// Weight of the preference-match factor.
    pub preference: f64,
    /// Weight of the timezone-fairness factor.
    pub fairness: f64,
}

impl Default for SlotWeights {
    fn default() -> Self {
        Self {
            availability: 0.4,
            preference: 0.35,
            fairness: 0.25,
        }
    }
}

impl SlotWeights {
    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.availability + self.preference + self.fairness
    }

    /// Check the sum-to-one invariant within [`WEIGHT_TOLERANCE`].
    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EngineError::InvalidWeights(sum));
        }
        Ok(())
    }
}

/// Parameters for the optimal-slot search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSearchConfig {
    /// Step between candidate start instants, in minutes.
    pub granularity_minutes: i64,
    /// Buffer distance at which the availability-margin factor saturates.
    pub margin_cap_minutes: i64,
    pub weights: SlotWeights,
}

impl Default for SlotSearchConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            margin_cap_minutes: 120,
            weights: SlotWeights::default(),
        }
    }
}

/// Thresholds for the overload conflict check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadThresholds {
    /// Multiplier above which an overload escalates from Low to Medium
    /// severity.
    pub escalation_factor: f64,
}

impl Default for OverloadThresholds {
    fn default() -> Self {
        Self {
            escalation_factor: 1.5,
        }
    }
}

/// An hour range `[start, end)` in local wall-clock hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

/// Weights for the effectiveness factors. Must sum to 1.0; when no
/// engagement data is supplied the remaining two are renormalized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectivenessWeights {
    pub duration: f64,
    pub timing: f64,
    pub engagement: f64,
}

impl Default for EffectivenessWeights {
    fn default() -> Self {
        Self {
            duration: 0.4,
            timing: 0.3,
            engagement: 0.3,
        }
    }
}

impl EffectivenessWeights {
    pub fn sum(&self) -> f64 {
        self.duration + self.timing + self.engagement
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EngineError::InvalidWeights(sum));
        }
        Ok(())
    }
}

/// Parameters for meeting-effectiveness scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectivenessConfig {
    pub weights: EffectivenessWeights,
    /// Local hour ranges considered most productive for meeting starts.
    pub productive_windows: Vec<HourRange>,
}

impl Default for EffectivenessConfig {
    fn default() -> Self {
        Self {
            weights: EffectivenessWeights::default(),
            productive_windows: vec![
                HourRange { start: 9, end: 12 },
                HourRange { start: 13, end: 16 },
            ],
        }
    }
}

/// Parameters for workload scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Meeting minutes per work day that map to the midpoint score of 5.
    pub daily_baseline_minutes: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            daily_baseline_minutes: 240.0,
        }
    }
}

/// Complete engine configuration with documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub slots: SlotSearchConfig,
    pub overload: OverloadThresholds,
    pub effectiveness: EffectivenessConfig,
    pub workload: WorkloadConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML and check the weight invariants.
    ///
    /// Missing sections and fields fall back to the defaults, so an empty
    /// string yields the default configuration.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(input).context("Failed to parse engine configuration TOML")?;
        config
            .validate()
            .context("Invalid engine configuration values")?;
        Ok(config)
    }

    /// Check all weight invariants.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.slots.weights.validate()?;
        self.effectiveness.weights.validate()?;
        Ok(())
    }
}
