//! Typed per-tick observation snapshot
//!
//! Built from the external save parser's JSON output. Every field has a
//! documented neutral default; the tolerant ingestion path substitutes the
//! default for wrong-typed fields instead of aborting the tick.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Observation field names, shared between ingestion and diagnostics.
pub mod fields {
    pub const OUR_TOTAL_ECONOMY: &str = "our_total_economy";
    pub const ENEMY_TOTAL_ECONOMY: &str = "enemy_total_economy";
    pub const POP_GROWTH_PRESSURE: &str = "pop_growth_pressure";
    pub const PLANET_CAPACITY_PRESSURE: &str = "planet_capacity_pressure";
    pub const ALLOY_DENSITY: &str = "alloy_density";
    pub const BIO_ASCENSION: &str = "bio_ascension";
    pub const MACHINE_AGE_VIRTUALITY: &str = "machine_age_virtuality";
    pub const SHATTERED_RING_ORIGIN: &str = "shattered_ring_origin";
    pub const STEAM_META_SIGNALS: &str = "steam_meta_signals";
}

/// Snapshot of the simulation state for one tick, read-only during evaluation.
///
/// Defaults are the documented neutral values: 0.0 for economy and pressure
/// signals, false for state flags, empty for meta signals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    /// Our empire's aggregate economy (non-negative)
    pub our_total_economy: f32,
    /// Aggregate enemy economy (non-negative)
    pub enemy_total_economy: f32,
    /// Population growth pressure, normalized to [0, 1]
    pub pop_growth_pressure: f32,
    /// Planet capacity pressure, normalized to [0, 1]
    pub planet_capacity_pressure: f32,
    /// Alloy share of the economy, normalized to [0, 1]
    pub alloy_density: f32,
    /// Biological ascension path unlocked
    pub bio_ascension: bool,
    /// Machine-age virtuality unlocked
    pub machine_age_virtuality: bool,
    /// Shattered ring origin (extra housing, low capacity pressure)
    pub shattered_ring_origin: bool,
    /// Opponent archetype signal key -> confidence, from external meta scraping.
    /// BTreeMap keeps iteration deterministic.
    pub steam_meta_signals: BTreeMap<String, f32>,
}

/// Names of fields that were present but wrong-typed and fell back to
/// their defaults during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub defaulted_fields: Vec<&'static str>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.defaulted_fields.is_empty()
    }
}

impl Observation {
    /// Build an observation from arbitrary JSON, field by field.
    ///
    /// Missing fields silently take their defaults; present-but-wrong-typed
    /// fields take their defaults and are named in the report; unknown extra
    /// fields are ignored. Never fails.
    pub fn from_value(value: &Value) -> (Self, IngestReport) {
        let mut report = IngestReport::default();
        let Some(map) = value.as_object() else {
            // Not even an object: everything defaults.
            if !value.is_null() {
                report.defaulted_fields.push("observation");
            }
            return (Observation::default(), report);
        };

        let mut obs = Observation::default();
        obs.our_total_economy = take_f32(map, fields::OUR_TOTAL_ECONOMY, &mut report);
        obs.enemy_total_economy = take_f32(map, fields::ENEMY_TOTAL_ECONOMY, &mut report);
        obs.pop_growth_pressure = take_f32(map, fields::POP_GROWTH_PRESSURE, &mut report);
        obs.planet_capacity_pressure = take_f32(map, fields::PLANET_CAPACITY_PRESSURE, &mut report);
        obs.alloy_density = take_f32(map, fields::ALLOY_DENSITY, &mut report);
        obs.bio_ascension = take_bool(map, fields::BIO_ASCENSION, &mut report);
        obs.machine_age_virtuality = take_bool(map, fields::MACHINE_AGE_VIRTUALITY, &mut report);
        obs.shattered_ring_origin = take_bool(map, fields::SHATTERED_RING_ORIGIN, &mut report);
        obs.steam_meta_signals = take_signals(map, &mut report);

        (obs.sanitized(), report)
    }

    /// Clamp every signal to its documented range.
    ///
    /// Economy totals are floored at zero, pressures clamped to [0, 1],
    /// non-finite values reset to the neutral default. Applied after every
    /// construction path so scoring only ever sees in-range signals.
    pub fn sanitized(mut self) -> Self {
        self.our_total_economy = sanitize_signal(self.our_total_economy, 0.0, f32::MAX);
        self.enemy_total_economy = sanitize_signal(self.enemy_total_economy, 0.0, f32::MAX);
        self.pop_growth_pressure = sanitize_signal(self.pop_growth_pressure, 0.0, 1.0);
        self.planet_capacity_pressure = sanitize_signal(self.planet_capacity_pressure, 0.0, 1.0);
        self.alloy_density = sanitize_signal(self.alloy_density, 0.0, 1.0);
        for confidence in self.steam_meta_signals.values_mut() {
            *confidence = sanitize_signal(*confidence, 0.0, f32::MAX);
        }
        self
    }
}

fn sanitize_signal(value: f32, lo: f32, hi: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(lo, hi)
}

fn take_f32(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
    report: &mut IngestReport,
) -> f32 {
    match map.get(key) {
        None => 0.0,
        Some(v) => match v.as_f64() {
            Some(n) => n as f32,
            None => {
                report.defaulted_fields.push(key);
                0.0
            }
        },
    }
}

fn take_bool(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
    report: &mut IngestReport,
) -> bool {
    match map.get(key) {
        None => false,
        Some(v) => match v.as_bool() {
            Some(b) => b,
            None => {
                report.defaulted_fields.push(key);
                false
            }
        },
    }
}

fn take_signals(
    map: &serde_json::Map<String, Value>,
    report: &mut IngestReport,
) -> BTreeMap<String, f32> {
    match map.get(fields::STEAM_META_SIGNALS) {
        None => BTreeMap::new(),
        Some(Value::Object(signals)) => {
            let mut out = BTreeMap::new();
            let mut dropped = false;
            for (key, v) in signals {
                match v.as_f64() {
                    Some(n) => {
                        out.insert(key.clone(), n as f32);
                    }
                    // The parser emits e.g. an "error" string on scrape
                    // failure; drop non-numeric entries key-wise.
                    None => dropped = true,
                }
            }
            if dropped {
                report.defaulted_fields.push(fields::STEAM_META_SIGNALS);
            }
            out
        }
        Some(_) => {
            report.defaulted_fields.push(fields::STEAM_META_SIGNALS);
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_silently() {
        let (obs, report) = Observation::from_value(&json!({
            "our_total_economy": 1000.0,
        }));
        assert_eq!(obs.our_total_economy, 1000.0);
        assert_eq!(obs.enemy_total_economy, 0.0);
        assert!(!obs.bio_ascension);
        assert!(obs.steam_meta_signals.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_wrong_typed_fields_default_and_report() {
        let (obs, report) = Observation::from_value(&json!({
            "our_total_economy": "lots",
            "bio_ascension": 1,
            "pop_growth_pressure": 0.4,
        }));
        assert_eq!(obs.our_total_economy, 0.0);
        assert!(!obs.bio_ascension);
        assert_eq!(obs.pop_growth_pressure, 0.4);
        assert_eq!(
            report.defaulted_fields,
            vec![fields::OUR_TOTAL_ECONOMY, fields::BIO_ASCENSION]
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let (obs, report) = Observation::from_value(&json!({
            "enemy_total_economy": 50.0,
            "totally_new_field": [1, 2, 3],
        }));
        assert_eq!(obs.enemy_total_economy, 50.0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_signal_map_drops_non_numeric_entries() {
        let (obs, report) = Observation::from_value(&json!({
            "steam_meta_signals": {
                "bio_rush_confidence": 0.65,
                "error": "timed out",
            },
        }));
        assert_eq!(obs.steam_meta_signals.get("bio_rush_confidence"), Some(&0.65));
        assert!(!obs.steam_meta_signals.contains_key("error"));
        assert_eq!(report.defaulted_fields, vec![fields::STEAM_META_SIGNALS]);
    }

    #[test]
    fn test_non_object_payload_defaults_everything() {
        let (obs, report) = Observation::from_value(&json!([1, 2, 3]));
        assert_eq!(obs.our_total_economy, 0.0);
        assert_eq!(report.defaulted_fields, vec!["observation"]);
    }

    #[test]
    fn test_sanitize_clamps_ranges() {
        let obs = Observation {
            our_total_economy: -5.0,
            pop_growth_pressure: 1.8,
            alloy_density: f32::NAN,
            ..Observation::default()
        }
        .sanitized();
        assert_eq!(obs.our_total_economy, 0.0);
        assert_eq!(obs.pop_growth_pressure, 1.0);
        assert_eq!(obs.alloy_density, 0.0);
    }
}
