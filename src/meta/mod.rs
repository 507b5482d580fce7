//! Counter-meta weight adjustment from opponent archetype signals
//!
//! The external parser attaches confidence scores for recognized opponent
//! archetypes (e.g. `bio_rush_confidence`). Above the detection threshold an
//! archetype contributes a fixed counter-delta to the weight vector, scaled
//! by confidence. Multiple detections sum, the per-component total is
//! clamped, and the final weight is floored at zero: an adjustment can
//! never invert a weight's sign. With no signal above threshold the base
//! weights pass through unmodified.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::{ComponentId, WeightVector};

/// Minimum confidence before an archetype influences the weights.
pub const META_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Bound on the summed per-component adjustment. Sum-then-clamp is the
/// calibration default for simultaneous detections (see DESIGN.md).
pub const MAX_COMPONENT_ADJUSTMENT: f32 = 0.5;

/// Classified opponent behavioral patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentArchetype {
    Aggressive,
    EconomicBoom,
    BioRush,
    Virtuality,
}

impl OpponentArchetype {
    pub const ALL: [OpponentArchetype; 4] = [
        OpponentArchetype::Aggressive,
        OpponentArchetype::EconomicBoom,
        OpponentArchetype::BioRush,
        OpponentArchetype::Virtuality,
    ];

    /// Signal key emitted by the external meta parser. Unknown keys in the
    /// signal map are ignored.
    pub fn signal_key(&self) -> &'static str {
        match self {
            OpponentArchetype::Aggressive => "aggro_confidence",
            OpponentArchetype::EconomicBoom => "eco_boom_confidence",
            OpponentArchetype::BioRush => "bio_rush_confidence",
            OpponentArchetype::Virtuality => "virtuality_confidence",
        }
    }

    /// Fixed counter-weight deltas at full confidence.
    fn counter_deltas(&self) -> [(ComponentId, f32); 2] {
        match self {
            OpponentArchetype::Aggressive => {
                [(ComponentId::ThreatPressure, 0.4), (ComponentId::AlloyFocus, 0.2)]
            }
            OpponentArchetype::EconomicBoom => {
                [(ComponentId::EconomicLead, 0.3), (ComponentId::ExpansionNeed, 0.2)]
            }
            OpponentArchetype::BioRush => {
                [(ComponentId::ThreatPressure, 0.25), (ComponentId::AlloyFocus, 0.25)]
            }
            OpponentArchetype::Virtuality => {
                [(ComponentId::TechMomentum, 0.35), (ComponentId::EconomicLead, 0.15)]
            }
        }
    }
}

/// Archetypes whose confidence meets the threshold, in declaration order.
pub fn detected(signals: &BTreeMap<String, f32>) -> Vec<(OpponentArchetype, f32)> {
    OpponentArchetype::ALL
        .iter()
        .filter_map(|archetype| {
            let confidence = *signals.get(archetype.signal_key())?;
            (confidence >= META_CONFIDENCE_THRESHOLD).then_some((*archetype, confidence))
        })
        .collect()
}

/// Adjust the base weight vector against detected opponent archetypes.
pub fn adjust_weights(base: &WeightVector, signals: &BTreeMap<String, f32>) -> WeightVector {
    let active = detected(signals);
    if active.is_empty() {
        return *base;
    }

    let mut adjustment = [0.0f32; ComponentId::COUNT];
    for (archetype, confidence) in &active {
        let scale = confidence.min(1.0);
        for (id, delta) in archetype.counter_deltas() {
            adjustment[id as usize] += delta * scale;
        }
    }

    let mut adjusted = *base;
    for id in ComponentId::ALL {
        let total = adjustment[id as usize]
            .clamp(-MAX_COMPONENT_ADJUSTMENT, MAX_COMPONENT_ADJUSTMENT);
        if total != 0.0 {
            adjusted.set(id, (base.get(id) + total).max(0.0));
        }
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn signals(entries: &[(&str, f32)]) -> BTreeMap<String, f32> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_no_signal_passes_through() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(&base, &BTreeMap::new());
        assert_eq!(adjusted, base);
    }

    #[test]
    fn test_below_threshold_passes_through() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(&base, &signals(&[("aggro_confidence", 0.49)]));
        assert_eq!(adjusted, base);
    }

    #[test]
    fn test_aggressive_signal_raises_threat_weight() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(&base, &signals(&[("aggro_confidence", 0.9)]));
        assert!(adjusted.get(ComponentId::ThreatPressure) > base.get(ComponentId::ThreatPressure));
        assert!(adjusted.get(ComponentId::AlloyFocus) > base.get(ComponentId::AlloyFocus));
        assert_eq!(adjusted.get(ComponentId::TechMomentum), base.get(ComponentId::TechMomentum));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(&base, &signals(&[("mystery_confidence", 0.99)]));
        assert_eq!(adjusted, base);
    }

    #[test]
    fn test_multiple_archetypes_sum_then_clamp() {
        let base = WeightVector::base(&EngineConfig::default());
        // Aggressive (0.4) + BioRush (0.25) at full confidence would sum to
        // 0.65 on threat_pressure; the clamp holds it at +0.5.
        let adjusted = adjust_weights(
            &base,
            &signals(&[("aggro_confidence", 1.0), ("bio_rush_confidence", 1.0)]),
        );
        let delta = adjusted.get(ComponentId::ThreatPressure) - base.get(ComponentId::ThreatPressure);
        assert!((delta - MAX_COMPONENT_ADJUSTMENT).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_confidence_is_capped() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(&base, &signals(&[("aggro_confidence", 1000.0)]));
        let delta = adjusted.get(ComponentId::ThreatPressure) - base.get(ComponentId::ThreatPressure);
        assert!(delta <= MAX_COMPONENT_ADJUSTMENT + 1e-6);
    }

    #[test]
    fn test_monotone_in_confidence() {
        let base = WeightVector::base(&EngineConfig::default());
        let mut previous = base.get(ComponentId::ThreatPressure);
        for confidence in [0.5, 0.6, 0.8, 1.0, 5.0] {
            let adjusted = adjust_weights(&base, &signals(&[("aggro_confidence", confidence)]));
            let weight = adjusted.get(ComponentId::ThreatPressure);
            assert!(weight >= previous);
            previous = weight;
        }
    }

    #[test]
    fn test_weight_sign_never_inverts() {
        let base = WeightVector::base(&EngineConfig::default());
        let adjusted = adjust_weights(
            &base,
            &signals(&[
                ("aggro_confidence", 1.0),
                ("eco_boom_confidence", 1.0),
                ("bio_rush_confidence", 1.0),
                ("virtuality_confidence", 1.0),
            ]),
        );
        for id in ComponentId::ALL {
            assert!(adjusted.get(id) >= 0.0);
        }
    }
}
