//! Evaluator configuration loaded from TOML
//!
//! All knobs have documented ranges and are clamped at load; a misconfigured
//! slider must never crash a tick. Rule tables live here as explicit struct
//! fields so tuning stays diffable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::Result;

/// Documented range for [`EngineConfig::aggression_slider`].
pub const AGGRESSION_RANGE: (f32, f32) = (0.5, 2.0);
/// Documented range for the difficulty biases.
pub const BIAS_RANGE: (f32, f32) = (0.25, 4.0);
/// Documented range for the low-difficulty projection cap (months).
pub const PROJECTION_CAP_RANGE: (u32, u32) = (1, 120);
/// Documented range for the diagnostics history capacity.
pub const HISTORY_CAPACITY_RANGE: (usize, usize) = (1, 512);

/// Difficulty tier, named after fleet ranks.
///
/// `Ensign` and `Captain` are the "lower" tiers that trigger the
/// projection-month cap in the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Ensign,
    Captain,
    Commodore,
    Admiral,
    GrandAdmiral,
}

impl DifficultyTier {
    /// Whether projection-style scoring must be capped for this tier.
    pub fn is_low(&self) -> bool {
        matches!(self, DifficultyTier::Ensign | DifficultyTier::Captain)
    }
}

/// Difficulty profile: per-component biases and the exploration gate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Difficulty tier (controls the projection cap)
    pub tier: DifficultyTier,
    /// Bias on economy-driven components (0.25 to 4.0)
    pub eco_bias: f32,
    /// Bias on research-driven components (0.25 to 4.0)
    pub tech_bias: f32,
    /// Bias on military components (0.25 to 4.0)
    pub mil_bias: f32,
    /// Gate for exploration-oriented actions
    pub curiosity_enabled: bool,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            tier: DifficultyTier::Commodore,
            eco_bias: 1.0,
            tech_bias: 1.0,
            mil_bias: 1.0,
            curiosity_enabled: true,
        }
    }
}

/// Compatibility opt-outs. Each flag disables exactly one scoring
/// adjustment rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compatibility {
    /// Drop the bio-ascension growth term from expansion_need and the
    /// bio term from tech_momentum
    pub disable_bio_ascension_rule: bool,
    /// Drop the machine-age-virtuality term from tech_momentum
    pub disable_virtuality_rule: bool,
    /// Drop the shattered-ring housing discount on capacity pressure
    pub disable_shattered_ring_rule: bool,
}

/// Performance caps bounding planner cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Max months of economic projection on lower difficulty tiers (1 to 120)
    pub max_projection_months_low_diff: u32,
    /// Diagnostics rolling-history capacity (1 to 512)
    pub history_capacity: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_projection_months_low_diff: 24,
            history_capacity: 64,
        }
    }
}

/// Complete evaluator configuration
///
/// Loaded once per session and immutable during a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scales threat-response and offensive-action weights (0.5 to 2.0)
    #[serde(default = "default_aggression")]
    pub aggression_slider: f32,
    /// Difficulty biases and exploration gate
    #[serde(default)]
    pub difficulty: DifficultyProfile,
    /// Compatibility opt-outs
    #[serde(default)]
    pub compat: Compatibility,
    /// Performance caps
    #[serde(default)]
    pub performance: PerformanceConfig,
}

fn default_aggression() -> f32 {
    1.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aggression_slider: default_aggression(),
            difficulty: DifficultyProfile::default(),
            compat: Compatibility::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file and clamp it to documented ranges.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&contents)?;
        Ok(config.clamped())
    }

    /// Return a copy with every knob clamped to its documented range.
    ///
    /// Out-of-range values are clamped, never rejected; non-finite values
    /// fall back to the knob's default. Each adjustment logs a warning.
    pub fn clamped(mut self) -> Self {
        self.aggression_slider = clamp_knob(
            "aggression_slider",
            self.aggression_slider,
            AGGRESSION_RANGE,
            default_aggression(),
        );
        self.difficulty.eco_bias =
            clamp_knob("difficulty.eco_bias", self.difficulty.eco_bias, BIAS_RANGE, 1.0);
        self.difficulty.tech_bias =
            clamp_knob("difficulty.tech_bias", self.difficulty.tech_bias, BIAS_RANGE, 1.0);
        self.difficulty.mil_bias =
            clamp_knob("difficulty.mil_bias", self.difficulty.mil_bias, BIAS_RANGE, 1.0);

        let (lo, hi) = PROJECTION_CAP_RANGE;
        let cap = self.performance.max_projection_months_low_diff.clamp(lo, hi);
        if cap != self.performance.max_projection_months_low_diff {
            tracing::warn!(
                from = self.performance.max_projection_months_low_diff,
                to = cap,
                "clamped performance.max_projection_months_low_diff"
            );
            self.performance.max_projection_months_low_diff = cap;
        }

        let (lo, hi) = HISTORY_CAPACITY_RANGE;
        let capacity = self.performance.history_capacity.clamp(lo, hi);
        if capacity != self.performance.history_capacity {
            tracing::warn!(
                from = self.performance.history_capacity,
                to = capacity,
                "clamped performance.history_capacity"
            );
            self.performance.history_capacity = capacity;
        }

        self
    }
}

fn clamp_knob(name: &str, value: f32, (lo, hi): (f32, f32), default: f32) -> f32 {
    if !value.is_finite() {
        tracing::warn!(knob = name, to = default, "non-finite knob reset to default");
        return default;
    }
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        tracing::warn!(knob = name, from = value, to = clamped, "clamped out-of-range knob");
    }
    clamped
}
