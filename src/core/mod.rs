pub mod error;
pub mod types;

pub use error::{Result, StratError};
pub use types::{Tick, SCORE_EPSILON};
