//! Core type definitions used throughout the evaluator

/// Simulation tick counter: one tick is one evaluator invocation,
/// corresponding to one simulated turn.
pub type Tick = u64;

/// Epsilon added to ratio denominators so a zero-economy observation
/// never divides by zero.
pub const SCORE_EPSILON: f32 = 1e-3;
