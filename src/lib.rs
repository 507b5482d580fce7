//! Strat AI - deterministic decision engine for 4X strategy simulations
//!
//! Invoked once per simulated turn with an observation snapshot; returns the
//! selected action plus the full scoring breakdown that produced it. Given
//! identical inputs and configuration the output is bit-identical.

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod doctrine;
pub mod meta;
pub mod observation;
pub mod planner;
pub mod scoring;
pub mod session;

pub use config::EngineConfig;
pub use observation::Observation;
pub use session::{Session, TickDecision};
