use thiserror::Error;

/// Failures of the glue layer (file I/O, payload syntax).
///
/// Recoverable per-tick conditions (malformed fields, out-of-range knobs,
/// infeasible candidates) are never errors: they are defaults, clamps, or
/// diagnostic flags, so a bad tick cannot terminate the host simulation.
#[derive(Error, Debug)]
pub enum StratError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Observation JSON error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StratError>;
