//! Action planner: candidate enumeration, feasibility filtering, selection
//!
//! Walks an explicit state machine each tick:
//! `Idle -> Scoring -> Filtering -> Selecting -> Logged`. Every candidate in
//! the static catalog is scored, infeasible candidates are filtered, and the
//! highest score wins with ties broken by catalog declaration order. When
//! nothing is feasible the planner falls back to `Hold`, so a tick never
//! ends without a decision.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::SCORE_EPSILON;
use crate::doctrine::{Doctrine, FleetPolicy};
use crate::observation::Observation;
use crate::scoring::{ComponentId, ScoreComponents};

/// Months of economic projection on higher difficulty tiers.
pub const FULL_PROJECTION_MONTHS: u32 = 60;

/// Assumed compound monthly growth for the projection term.
const MONTHLY_GROWTH: f32 = 1.012;

/// Unique action identifier.
///
/// Declaration order of [`ActionId::CATALOG`] is the fixed tie-break
/// priority. `Hold` is the documented fallback and is never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    ExpandColonize,
    DevelopEconomy,
    BuildAlloyForges,
    ResearchFocus,
    RaiseFleet,
    FortifyBorders,
    PrepareWar,
    ExploreSurvey,
    Hold,
}

impl ActionId {
    /// Doctrine this action advances, for the synergy bonus.
    pub fn aligned_doctrine(&self) -> Option<Doctrine> {
        match self {
            ActionId::ExpandColonize | ActionId::DevelopEconomy => {
                Some(Doctrine::EconomicExpansion)
            }
            ActionId::ResearchFocus | ActionId::ExploreSurvey => Some(Doctrine::TechAscendancy),
            ActionId::BuildAlloyForges | ActionId::RaiseFleet | ActionId::PrepareWar => {
                Some(Doctrine::MilitaryBuildup)
            }
            ActionId::FortifyBorders => Some(Doctrine::DefensiveConsolidation),
            ActionId::Hold => None,
        }
    }
}

/// Everything a candidate's predicates may look at.
pub struct PlanContext<'a> {
    pub obs: &'a Observation,
    pub config: &'a EngineConfig,
    pub weighted: &'a ScoreComponents,
    pub policy: &'a FleetPolicy,
    /// An above-threshold aggressive opponent signal was detected this tick.
    pub aggressive_detected: bool,
}

/// A statically enumerable candidate action.
pub struct Candidate {
    pub id: ActionId,
    pub feasible: fn(&PlanContext) -> bool,
    pub base_score: fn(&PlanContext) -> f32,
}

/// The scored candidate set, in fixed priority order.
pub const CATALOG: [Candidate; 8] = [
    Candidate {
        id: ActionId::ExpandColonize,
        feasible: can_expand,
        base_score: score_expand_colonize,
    },
    Candidate {
        id: ActionId::DevelopEconomy,
        feasible: always,
        base_score: score_develop_economy,
    },
    Candidate {
        id: ActionId::BuildAlloyForges,
        feasible: can_build_forges,
        base_score: score_build_alloy_forges,
    },
    Candidate {
        id: ActionId::ResearchFocus,
        feasible: always,
        base_score: score_research_focus,
    },
    Candidate {
        id: ActionId::RaiseFleet,
        feasible: always,
        base_score: score_raise_fleet,
    },
    Candidate {
        id: ActionId::FortifyBorders,
        feasible: always,
        base_score: score_fortify_borders,
    },
    Candidate {
        id: ActionId::PrepareWar,
        feasible: can_prepare_war,
        base_score: score_prepare_war,
    },
    Candidate {
        id: ActionId::ExploreSurvey,
        feasible: can_explore,
        base_score: score_explore_survey,
    },
];

fn always(_ctx: &PlanContext) -> bool {
    true
}

fn can_expand(ctx: &PlanContext) -> bool {
    ctx.obs.planet_capacity_pressure < 0.95
}

fn can_build_forges(ctx: &PlanContext) -> bool {
    ctx.obs.alloy_density < 0.9
}

fn can_prepare_war(ctx: &PlanContext) -> bool {
    ctx.config.aggression_slider >= 0.75 || ctx.aggressive_detected
}

fn can_explore(ctx: &PlanContext) -> bool {
    ctx.config.difficulty.curiosity_enabled
}

fn score_expand_colonize(ctx: &PlanContext) -> f32 {
    ctx.weighted.get(ComponentId::ExpansionNeed)
        + 0.25 * ctx.weighted.get(ComponentId::CuriosityDrive)
        + projection_bonus(ctx)
}

fn score_develop_economy(ctx: &PlanContext) -> f32 {
    // Catch-up term: a negative weighted lead means the enemy is ahead.
    (-ctx.weighted.get(ComponentId::EconomicLead)).max(0.0)
        + 0.3 * ctx.weighted.get(ComponentId::ExpansionNeed)
        + projection_bonus(ctx)
}

fn score_build_alloy_forges(ctx: &PlanContext) -> f32 {
    0.4 * ctx.weighted.get(ComponentId::ThreatPressure) + 0.25 * (1.0 - ctx.obs.alloy_density)
}

fn score_research_focus(ctx: &PlanContext) -> f32 {
    ctx.weighted.get(ComponentId::TechMomentum)
}

fn score_raise_fleet(ctx: &PlanContext) -> f32 {
    0.8 * ctx.weighted.get(ComponentId::ThreatPressure)
        + 0.4 * ctx.weighted.get(ComponentId::AlloyFocus)
}

fn score_fortify_borders(ctx: &PlanContext) -> f32 {
    0.6 * ctx.weighted.get(ComponentId::ThreatPressure)
        - 0.2 * ctx.weighted.get(ComponentId::EconomicLead)
}

fn score_prepare_war(ctx: &PlanContext) -> f32 {
    0.5 * ctx.weighted.get(ComponentId::ThreatPressure) * ctx.config.aggression_slider
        + 0.3 * ctx.weighted.get(ComponentId::EconomicLead)
}

fn score_explore_survey(ctx: &PlanContext) -> f32 {
    ctx.weighted.get(ComponentId::CuriosityDrive)
}

/// Compound-growth projection term for economic candidates, in [0, 0.2].
///
/// Lower difficulty tiers cap the horizon at the configured month limit;
/// higher tiers project the full horizon.
fn projection_bonus(ctx: &PlanContext) -> f32 {
    let months = if ctx.config.difficulty.tier.is_low() {
        FULL_PROJECTION_MONTHS.min(ctx.config.performance.max_projection_months_low_diff)
    } else {
        FULL_PROJECTION_MONTHS
    };
    let growth = MONTHLY_GROWTH.powi(months as i32);
    let our_share = ctx.obs.our_total_economy
        / (ctx.obs.our_total_economy + ctx.obs.enemy_total_economy + SCORE_EPSILON);
    0.2 * (growth - 1.0).min(1.0) * our_share.clamp(0.0, 1.0)
}

/// Planner state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerState {
    Idle,
    Scoring,
    Filtering,
    Selecting,
    Logged,
}

/// Result of one planning pass.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub action: ActionId,
    /// True when every candidate was infeasible and `Hold` was substituted.
    pub fallback: bool,
    /// Feasible candidates with their final scores, in catalog order.
    pub scored: Vec<(ActionId, f32)>,
}

/// Per-tick action planner.
#[derive(Debug)]
pub struct Planner {
    state: PlannerState,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self {
            state: PlannerState::Idle,
        }
    }

    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// Plan one tick over the static catalog.
    pub fn plan(&mut self, ctx: &PlanContext) -> PlanOutcome {
        self.plan_with(&CATALOG, ctx)
    }

    /// Plan one tick over an explicit candidate set (the static catalog in
    /// production; tests substitute their own).
    pub fn plan_with(&mut self, candidates: &[Candidate], ctx: &PlanContext) -> PlanOutcome {
        // Logged is terminal for the previous tick; either way we start fresh.
        self.state = PlannerState::Idle;

        self.state = PlannerState::Scoring;
        let scored: Vec<(&Candidate, f32)> = candidates
            .iter()
            .map(|c| (c, self.score_candidate(c, ctx)))
            .collect();

        self.state = PlannerState::Filtering;
        let feasible: Vec<(&Candidate, f32)> = scored
            .into_iter()
            .filter(|(c, _)| (c.feasible)(ctx))
            .collect();

        self.state = PlannerState::Selecting;
        let mut best: Option<(ActionId, f32)> = None;
        for (candidate, score) in &feasible {
            match best {
                // Strict comparison keeps the earlier catalog entry on ties.
                Some((_, best_score)) if *score <= best_score => {}
                _ => best = Some((candidate.id, *score)),
            }
        }

        let outcome = match best {
            Some((action, _)) => PlanOutcome {
                action,
                fallback: false,
                scored: feasible.iter().map(|(c, s)| (c.id, *s)).collect(),
            },
            None => {
                tracing::debug!("no feasible candidate, holding");
                PlanOutcome {
                    action: ActionId::Hold,
                    fallback: true,
                    scored: Vec::new(),
                }
            }
        };

        self.state = PlannerState::Logged;
        outcome
    }

    fn score_candidate(&self, candidate: &Candidate, ctx: &PlanContext) -> f32 {
        let mut score = (candidate.base_score)(ctx);
        if candidate.id.aligned_doctrine() == Some(ctx.policy.doctrine) {
            score += 0.1 * ctx.policy.score;
        }
        if !score.is_finite() {
            // Defensive symmetry with the component guard.
            score = 0.0;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctrine;
    use crate::scoring::{raw_components, WeightVector};

    fn context_parts(obs: &Observation, config: &EngineConfig) -> (ScoreComponents, FleetPolicy) {
        let raw = raw_components(obs, config);
        let (weighted, _) = WeightVector::base(config).apply(&raw);
        let policy = doctrine::recommend(&weighted, obs);
        (weighted, policy)
    }

    #[test]
    fn test_planner_reaches_logged_state() {
        let obs = Observation::default();
        let config = EngineConfig::default();
        let (weighted, policy) = context_parts(&obs, &config);
        let ctx = PlanContext {
            obs: &obs,
            config: &config,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        let mut planner = Planner::new();
        assert_eq!(planner.state(), PlannerState::Idle);
        let outcome = planner.plan(&ctx);
        assert_eq!(planner.state(), PlannerState::Logged);
        assert!(!outcome.fallback);
    }

    #[test]
    fn test_all_infeasible_falls_back_to_hold() {
        fn never(_ctx: &PlanContext) -> bool {
            false
        }
        fn one(_ctx: &PlanContext) -> f32 {
            1.0
        }
        let candidates = [
            Candidate {
                id: ActionId::RaiseFleet,
                feasible: never,
                base_score: one,
            },
            Candidate {
                id: ActionId::ExpandColonize,
                feasible: never,
                base_score: one,
            },
        ];
        let obs = Observation::default();
        let config = EngineConfig::default();
        let (weighted, policy) = context_parts(&obs, &config);
        let ctx = PlanContext {
            obs: &obs,
            config: &config,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        let outcome = Planner::new().plan_with(&candidates, &ctx);
        assert_eq!(outcome.action, ActionId::Hold);
        assert!(outcome.fallback);
        assert!(outcome.scored.is_empty());
    }

    #[test]
    fn test_tie_breaks_by_catalog_order() {
        fn one(_ctx: &PlanContext) -> f32 {
            1.0
        }
        let candidates = [
            Candidate {
                id: ActionId::ResearchFocus,
                feasible: always,
                base_score: one,
            },
            Candidate {
                id: ActionId::RaiseFleet,
                feasible: always,
                base_score: one,
            },
        ];
        let obs = Observation::default();
        let config = EngineConfig::default();
        let (weighted, policy) = context_parts(&obs, &config);
        let ctx = PlanContext {
            obs: &obs,
            config: &config,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        let outcome = Planner::new().plan_with(&candidates, &ctx);
        assert_eq!(outcome.action, ActionId::ResearchFocus);
    }

    #[test]
    fn test_explore_requires_curiosity() {
        let obs = Observation::default();
        let mut config = EngineConfig::default();
        config.difficulty.curiosity_enabled = false;
        let (weighted, policy) = context_parts(&obs, &config);
        let ctx = PlanContext {
            obs: &obs,
            config: &config,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        let outcome = Planner::new().plan(&ctx);
        assert!(outcome.scored.iter().all(|(id, _)| *id != ActionId::ExploreSurvey));
    }

    #[test]
    fn test_projection_capped_on_low_difficulty() {
        let obs = Observation {
            our_total_economy: 1000.0,
            enemy_total_economy: 1000.0,
            ..Observation::default()
        };
        let mut low = EngineConfig::default();
        low.difficulty.tier = crate::config::DifficultyTier::Ensign;
        low.performance.max_projection_months_low_diff = 6;
        let high = EngineConfig::default();

        let (weighted, policy) = context_parts(&obs, &high);
        let ctx_high = PlanContext {
            obs: &obs,
            config: &high,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        let ctx_low = PlanContext {
            obs: &obs,
            config: &low,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected: false,
        };
        assert!(projection_bonus(&ctx_low) < projection_bonus(&ctx_high));
    }
}
