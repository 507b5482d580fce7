//! Strat AI - Entry Point
//!
//! Thin CLI around the evaluator: reads the save parser's observation JSON,
//! loads an optional config TOML, evaluates one or more ticks, and prints
//! the decision as JSON.

use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use strat_ai::core::error::Result;
use strat_ai::{EngineConfig, Session};

/// Evaluate simulation ticks from an observation snapshot
#[derive(Parser, Debug)]
#[command(name = "strat-ai")]
#[command(about = "Deterministic strategy AI evaluator for 4X simulation ticks")]
struct Args {
    /// Observation JSON file ("-" for stdin)
    observation: PathBuf,

    /// Config TOML file (defaults used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to evaluate against the snapshot
    #[arg(long, default_value_t = 1)]
    ticks: u64,

    /// Pretty-print the output JSON
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strat_ai=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let payload = read_observation(&args.observation)?;
    let mut session = Session::new(config);

    let mut decision = None;
    for _ in 0..args.ticks.max(1) {
        decision = Some(session.ingest_and_evaluate(&payload));
    }
    let decision = decision.expect("at least one tick is evaluated");

    tracing::info!(
        action = ?decision.selected_action,
        doctrine = ?decision.diagnostics.doctrine,
        tick = decision.diagnostics.tick,
        "evaluation complete"
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&decision)?
    } else {
        serde_json::to_string(&decision)?
    };
    println!("{output}");

    Ok(())
}

fn read_observation(path: &PathBuf) -> Result<serde_json::Value> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&contents)?)
}
