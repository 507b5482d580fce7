//! Score component functions and weight vectors
//!
//! Every component is a pure function of (Observation, EngineConfig) with a
//! documented bound, so identical inputs always reproduce identical outputs.
//! The total is a linear weighted combination in the style of a battle score:
//! `score = Σ weightᵢ · componentᵢ`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::EngineConfig;
use crate::core::SCORE_EPSILON;
use crate::observation::Observation;

/// Named score components, in fixed declaration order.
///
/// The declaration order is the order components are reported in and the
/// deterministic tie-break order for by-magnitude rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    EconomicLead,
    ThreatPressure,
    ExpansionNeed,
    AlloyFocus,
    TechMomentum,
    CuriosityDrive,
}

impl ComponentId {
    pub const COUNT: usize = 6;

    pub const ALL: [ComponentId; ComponentId::COUNT] = [
        ComponentId::EconomicLead,
        ComponentId::ThreatPressure,
        ComponentId::ExpansionNeed,
        ComponentId::AlloyFocus,
        ComponentId::TechMomentum,
        ComponentId::CuriosityDrive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComponentId::EconomicLead => "economic_lead",
            ComponentId::ThreatPressure => "threat_pressure",
            ComponentId::ExpansionNeed => "expansion_need",
            ComponentId::AlloyFocus => "alloy_focus",
            ComponentId::TechMomentum => "tech_momentum",
            ComponentId::CuriosityDrive => "curiosity_drive",
        }
    }

    /// Documented [min, max] bound of the raw component value.
    pub fn bounds(&self) -> (f32, f32) {
        match self {
            ComponentId::EconomicLead => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Ordered component-name -> value mapping, produced fresh each tick.
///
/// Serializes as a map in component declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreComponents {
    values: [f32; ComponentId::COUNT],
}

impl ScoreComponents {
    pub fn get(&self, id: ComponentId) -> f32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: ComponentId, value: f32) {
        self.values[id.index()] = value;
    }

    /// Components in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, f32)> + '_ {
        ComponentId::ALL.iter().map(move |id| (*id, self.get(*id)))
    }
}

impl Serialize for ScoreComponents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ComponentId::COUNT))?;
        for (id, value) in self.iter() {
            map.serialize_entry(id.name(), &value)?;
        }
        map.end()
    }
}

/// Per-component weights applied on top of the raw components.
///
/// Base weights are derived from configuration and are non-negative by
/// construction (the bias and slider clamps). The meta selector adjusts a
/// copy of this vector each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector {
    values: [f32; ComponentId::COUNT],
}

impl WeightVector {
    /// Configuration-derived base weights, before meta adjustment.
    pub fn base(config: &EngineConfig) -> Self {
        let d = &config.difficulty;
        let mut weights = WeightVector {
            values: [0.0; ComponentId::COUNT],
        };
        weights.set(ComponentId::EconomicLead, d.eco_bias);
        weights.set(ComponentId::ThreatPressure, d.mil_bias * config.aggression_slider);
        weights.set(ComponentId::ExpansionNeed, d.eco_bias);
        weights.set(ComponentId::AlloyFocus, d.mil_bias);
        weights.set(ComponentId::TechMomentum, d.tech_bias);
        weights.set(ComponentId::CuriosityDrive, 1.0);
        weights
    }

    pub fn get(&self, id: ComponentId) -> f32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: ComponentId, value: f32) {
        self.values[id.index()] = value;
    }

    /// Apply the weights to raw components.
    ///
    /// A non-finite raw value is an internal invariant violation: the
    /// offending component is substituted with 0.0 and returned in the
    /// second element so the recorder can flag it. Never panics and never
    /// produces a non-finite weighted value.
    pub fn apply(&self, raw: &ScoreComponents) -> (ScoreComponents, Vec<ComponentId>) {
        let mut weighted = ScoreComponents::default();
        let mut non_finite = Vec::new();
        for (id, value) in raw.iter() {
            let product = value * self.get(id);
            if product.is_finite() {
                weighted.set(id, product);
            } else {
                non_finite.push(id);
                weighted.set(id, 0.0);
            }
        }
        (weighted, non_finite)
    }
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ComponentId::COUNT))?;
        for id in ComponentId::ALL {
            map.serialize_entry(id.name(), &self.get(id))?;
        }
        map.end()
    }
}

/// Compute every raw component for one tick.
pub fn raw_components(obs: &Observation, config: &EngineConfig) -> ScoreComponents {
    let mut components = ScoreComponents::default();
    components.set(ComponentId::EconomicLead, economic_lead(obs));
    components.set(ComponentId::ThreatPressure, threat_pressure(obs));
    components.set(ComponentId::ExpansionNeed, expansion_need(obs, config));
    components.set(ComponentId::AlloyFocus, alloy_focus(obs));
    components.set(ComponentId::TechMomentum, tech_momentum(obs, config));
    components.set(ComponentId::CuriosityDrive, curiosity_drive(obs, config));
    components
}

/// Relative economic advantage in [-1, 1]. Additive epsilon in the
/// denominator handles a dead enemy economy without division by zero.
fn economic_lead(obs: &Observation) -> f32 {
    let total = obs.our_total_economy + obs.enemy_total_economy + SCORE_EPSILON;
    ((obs.our_total_economy - obs.enemy_total_economy) / total).clamp(-1.0, 1.0)
}

/// Enemy share of the combined economy in [0, 1].
fn threat_pressure(obs: &Observation) -> f32 {
    let total = obs.our_total_economy + obs.enemy_total_economy + SCORE_EPSILON;
    (obs.enemy_total_economy / total).clamp(0.0, 1.0)
}

/// Need for new colonies/housing in [0, 1].
///
/// Shattered-ring empires get the capacity term halved (ring housing), and
/// bio-ascended empires a flat growth term, each gated by its compat opt-out.
fn expansion_need(obs: &Observation, config: &EngineConfig) -> f32 {
    let mut capacity = obs.planet_capacity_pressure;
    if obs.shattered_ring_origin && !config.compat.disable_shattered_ring_rule {
        capacity *= 0.5;
    }
    let mut need = 0.6 * obs.pop_growth_pressure + 0.4 * capacity;
    if obs.bio_ascension && !config.compat.disable_bio_ascension_rule {
        need += 0.1;
    }
    need.clamp(0.0, 1.0)
}

/// Alloy share of the economy in [0, 1].
fn alloy_focus(obs: &Observation) -> f32 {
    obs.alloy_density.clamp(0.0, 1.0)
}

/// Research momentum in [0, 1], driven by unlocked ascension features.
fn tech_momentum(obs: &Observation, config: &EngineConfig) -> f32 {
    let mut momentum: f32 = 0.25;
    if obs.machine_age_virtuality && !config.compat.disable_virtuality_rule {
        momentum += 0.35;
    }
    if obs.bio_ascension && !config.compat.disable_bio_ascension_rule {
        momentum += 0.15;
    }
    momentum.clamp(0.0, 1.0)
}

/// Exploration drive in [0, 1]: room to look around when threat is low.
/// Zero whenever the difficulty profile disables curiosity.
fn curiosity_drive(obs: &Observation, config: &EngineConfig) -> f32 {
    if !config.difficulty.curiosity_enabled {
        return 0.0;
    }
    (0.5 * (1.0 - threat_pressure(obs))).clamp(0.0, 1.0)
}
