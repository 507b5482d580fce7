//! Doctrine and fleet-composition policy adapter
//!
//! Maps the weighted score components onto a small catalog of strategic
//! postures. Each doctrine has a feasibility predicate over the observation
//! and a fixed affinity table; ties break by the declared priority order,
//! never by iteration accident.

use serde::{Deserialize, Serialize};

use crate::observation::Observation;
use crate::scoring::{ComponentId, ScoreComponents};

/// Named strategic postures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Doctrine {
    EconomicExpansion,
    TechAscendancy,
    MilitaryBuildup,
    DefensiveConsolidation,
    BioForging,
    VirtualSwarm,
}

impl Doctrine {
    /// Declared tie-break priority: earlier wins on equal score.
    pub const PRIORITY: [Doctrine; 6] = [
        Doctrine::MilitaryBuildup,
        Doctrine::DefensiveConsolidation,
        Doctrine::EconomicExpansion,
        Doctrine::TechAscendancy,
        Doctrine::BioForging,
        Doctrine::VirtualSwarm,
    ];

    /// Whether this doctrine is legal given the current observation.
    pub fn feasible(&self, obs: &Observation) -> bool {
        match self {
            Doctrine::BioForging => obs.bio_ascension,
            Doctrine::VirtualSwarm => obs.machine_age_virtuality,
            _ => true,
        }
    }

    /// Fixed affinity table: weighted components contributing to this
    /// doctrine's score.
    fn affinities(&self) -> &'static [(ComponentId, f32)] {
        match self {
            Doctrine::EconomicExpansion => &[
                (ComponentId::EconomicLead, 0.5),
                (ComponentId::ExpansionNeed, 1.0),
                (ComponentId::CuriosityDrive, 0.2),
            ],
            Doctrine::TechAscendancy => &[
                (ComponentId::TechMomentum, 1.0),
                (ComponentId::EconomicLead, 0.3),
            ],
            Doctrine::MilitaryBuildup => &[
                (ComponentId::ThreatPressure, 1.0),
                (ComponentId::AlloyFocus, 0.7),
            ],
            // Negative economic-lead affinity: falling behind favors turtling.
            Doctrine::DefensiveConsolidation => &[
                (ComponentId::ThreatPressure, 0.8),
                (ComponentId::EconomicLead, -0.3),
            ],
            Doctrine::BioForging => &[
                (ComponentId::ExpansionNeed, 0.7),
                (ComponentId::ThreatPressure, 0.4),
            ],
            Doctrine::VirtualSwarm => &[
                (ComponentId::TechMomentum, 0.8),
                (ComponentId::AlloyFocus, 0.5),
            ],
        }
    }

    /// Doctrine score: dot product of weighted components and affinities.
    pub fn score(&self, weighted: &ScoreComponents) -> f32 {
        self.affinities()
            .iter()
            .map(|(id, affinity)| weighted.get(*id) * affinity)
            .sum()
    }
}

/// Fleet composition templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetComposition {
    BalancedLine,
    CorvetteSwarm,
    BattleshipWall,
    CarrierStandoff,
}

/// Selected doctrine plus the fleet composition that supports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FleetPolicy {
    pub doctrine: Doctrine,
    pub composition: FleetComposition,
    pub score: f32,
}

/// Pick the highest-scoring feasible doctrine and its composition.
///
/// Iterates in [`Doctrine::PRIORITY`] order with a strict `>` comparison,
/// so on ties the earlier (higher-priority) doctrine wins. At least four
/// doctrines are always feasible, so a winner always exists.
pub fn recommend(weighted: &ScoreComponents, obs: &Observation) -> FleetPolicy {
    let mut best_score = f32::MIN;
    let mut best = Doctrine::PRIORITY[0];

    for doctrine in Doctrine::PRIORITY {
        if !doctrine.feasible(obs) {
            continue;
        }
        let score = doctrine.score(weighted);
        if score > best_score {
            best_score = score;
            best = doctrine;
        }
    }

    FleetPolicy {
        doctrine: best,
        composition: composition_for(best, weighted),
        score: best_score,
    }
}

/// Deterministic composition choice for a doctrine.
fn composition_for(doctrine: Doctrine, weighted: &ScoreComponents) -> FleetComposition {
    match doctrine {
        Doctrine::MilitaryBuildup | Doctrine::BioForging => {
            // Alloy-rich war economies field capital ships; poor ones swarm.
            if weighted.get(ComponentId::AlloyFocus) >= 0.5 {
                FleetComposition::BattleshipWall
            } else {
                FleetComposition::CorvetteSwarm
            }
        }
        Doctrine::DefensiveConsolidation => FleetComposition::CarrierStandoff,
        Doctrine::VirtualSwarm => FleetComposition::CorvetteSwarm,
        Doctrine::EconomicExpansion | Doctrine::TechAscendancy => FleetComposition::BalancedLine,
    }
}
