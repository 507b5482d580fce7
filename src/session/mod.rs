//! Session state and the per-tick evaluation entry point
//!
//! One `Session` lives for the whole sitting: it owns the clamped
//! configuration, the tick counter, and the diagnostics history. Each tick
//! runs the full pipeline (scoring, counter-meta weight adjustment, doctrine
//! recommendation, action planning) and records the breakdown before
//! returning it.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::core::Tick;
use crate::diagnostics::{Anomaly, DiagnosticsHistory, EvaluationRecord};
use crate::doctrine;
use crate::meta;
use crate::observation::{IngestReport, Observation};
use crate::planner::{PlanContext, Planner};
use crate::scoring::{self, ScoreComponents, WeightVector};

/// What the caller gets back from one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickDecision {
    pub selected_action: crate::planner::ActionId,
    /// Weighted score components behind the selection.
    pub score_components: ScoreComponents,
    /// Full diagnostic record for this tick.
    pub diagnostics: EvaluationRecord,
}

/// Process-wide evaluator session.
pub struct Session {
    config: EngineConfig,
    planner: Planner,
    history: DiagnosticsHistory,
    tick: Tick,
}

impl Session {
    /// Create a session. The configuration is clamped to documented ranges
    /// here, once; it is immutable for the session's lifetime.
    pub fn new(config: EngineConfig) -> Self {
        let config = config.clamped();
        let history = DiagnosticsHistory::new(config.performance.history_capacity);
        Self {
            config,
            planner: Planner::new(),
            history,
            tick: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only diagnostics surface for external inspection tools.
    pub fn history(&self) -> &DiagnosticsHistory {
        &self.history
    }

    /// Number of ticks evaluated so far.
    pub fn ticks_evaluated(&self) -> Tick {
        self.tick
    }

    /// Ingest a raw JSON payload and evaluate one tick.
    ///
    /// Wrong-typed fields take defaults and are named in the record; this
    /// path never fails.
    pub fn ingest_and_evaluate(&mut self, payload: &serde_json::Value) -> TickDecision {
        let (observation, report) = Observation::from_value(payload);
        if !report.is_clean() {
            tracing::warn!(fields = ?report.defaulted_fields, "observation fields defaulted");
        }
        self.evaluate_with_report(observation, report)
    }

    /// Evaluate one tick from an already-typed observation.
    pub fn evaluate_tick(&mut self, observation: Observation) -> TickDecision {
        self.evaluate_with_report(observation, IngestReport::default())
    }

    fn evaluate_with_report(
        &mut self,
        observation: Observation,
        report: IngestReport,
    ) -> TickDecision {
        let obs = observation.sanitized();
        self.tick += 1;

        let raw = scoring::raw_components(&obs, &self.config);
        let base_weights = WeightVector::base(&self.config);
        let weights = meta::adjust_weights(&base_weights, &obs.steam_meta_signals);
        let (weighted, non_finite) = weights.apply(&raw);

        let policy = doctrine::recommend(&weighted, &obs);

        let aggressive_detected = meta::detected(&obs.steam_meta_signals)
            .iter()
            .any(|(archetype, _)| *archetype == meta::OpponentArchetype::Aggressive);
        let ctx = PlanContext {
            obs: &obs,
            config: &self.config,
            weighted: &weighted,
            policy: &policy,
            aggressive_detected,
        };
        let outcome = self.planner.plan(&ctx);

        let record = EvaluationRecord {
            tick: self.tick,
            action: outcome.action,
            fallback: outcome.fallback,
            doctrine: policy.doctrine,
            composition: policy.composition,
            raw_components: raw,
            components: weighted,
            weights,
            anomalies: non_finite.into_iter().map(Anomaly::NonFiniteComponent).collect(),
            defaulted_fields: report.defaulted_fields,
        };
        self.history.record(record.clone());

        tracing::debug!(
            tick = self.tick,
            action = ?outcome.action,
            doctrine = ?policy.doctrine,
            fallback = outcome.fallback,
            "tick evaluated"
        );

        TickDecision {
            selected_action: outcome.action,
            score_components: weighted,
            diagnostics: record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tick_counter_advances() {
        let mut session = Session::new(EngineConfig::default());
        session.evaluate_tick(Observation::default());
        session.evaluate_tick(Observation::default());
        assert_eq!(session.ticks_evaluated(), 2);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_ingest_records_defaulted_fields() {
        let mut session = Session::new(EngineConfig::default());
        let decision = session.ingest_and_evaluate(&json!({
            "our_total_economy": "broken",
        }));
        assert_eq!(decision.diagnostics.defaulted_fields, vec!["our_total_economy"]);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let mut config = EngineConfig::default();
        config.performance.history_capacity = 2;
        let mut session = Session::new(config);
        for _ in 0..5 {
            session.evaluate_tick(Observation::default());
        }
        assert_eq!(session.history().len(), 2);
        let ticks: Vec<u64> = session.history().records().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![4, 5]);
    }
}
