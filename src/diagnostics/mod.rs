//! Evaluation diagnostics: per-tick records in a bounded rolling history
//!
//! The history is an explicitly owned FIFO container, written exactly once
//! per tick by the recorder and read-only everywhere else. Capacity is fixed
//! at construction; the oldest record is evicted first.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::VecDeque;

use crate::core::Tick;
use crate::doctrine::{Doctrine, FleetComposition};
use crate::planner::ActionId;
use crate::scoring::{ComponentId, ScoreComponents, WeightVector};

/// Internal invariant violations recovered during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    /// A scoring function produced a non-finite value; 0.0 was substituted.
    NonFiniteComponent(ComponentId),
}

/// Everything recorded about one tick's evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub tick: Tick,
    pub action: ActionId,
    /// The fallback hold action was substituted (no feasible candidate).
    pub fallback: bool,
    pub doctrine: Doctrine,
    pub composition: FleetComposition,
    /// Raw components before weighting.
    pub raw_components: ScoreComponents,
    /// Weighted components, the breakdown behind the selected action.
    pub components: ScoreComponents,
    /// Post-meta-adjustment weights applied this tick.
    pub weights: WeightVector,
    pub anomalies: Vec<Anomaly>,
    /// Observation fields that fell back to defaults during ingestion.
    pub defaulted_fields: Vec<&'static str>,
}

impl EvaluationRecord {
    /// The `n` weighted components with the largest magnitude, descending.
    /// Equal magnitudes keep component declaration order.
    pub fn top_components(&self, n: usize) -> Vec<(ComponentId, f32)> {
        let mut entries: Vec<(ComponentId, f32)> = self.components.iter().collect();
        entries.sort_by_key(|(_, value)| std::cmp::Reverse(OrderedFloat(value.abs())));
        entries.truncate(n);
        entries
    }
}

/// Bounded rolling history of evaluation records.
#[derive(Debug)]
pub struct DiagnosticsHistory {
    records: VecDeque<EvaluationRecord>,
    capacity: usize,
}

impl DiagnosticsHistory {
    /// Capacity is floored at 1: a history that can hold nothing is useless.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, evicting the oldest when full. The sole writer.
    pub fn record(&mut self, record: EvaluationRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records in insertion order, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.records.iter()
    }

    /// The most recent record, if any tick has been evaluated.
    pub fn latest(&self) -> Option<&EvaluationRecord> {
        self.records.back()
    }
}
