//! Skill Planner - Entry Point
//!
//! Loads the reference table, reads one scan, and prints the purchase list
//! for a single planning cycle.

use clap::Parser;
use std::path::PathBuf;

use skill_planner::core::error::Result;
use skill_planner::plan::{PlanSettings, Planner};
use skill_planner::reference::load_reference_table;
use skill_planner::{PlanError, PlannerConfig, ScanResult};

/// Plan skill purchases for one scan of the purchase screen
#[derive(Parser, Debug)]
#[command(name = "skill-planner")]
#[command(about = "Plan which skills to buy from a scanned skill list under a point budget")]
struct Args {
    /// Reference table (TOML, or JSON by extension)
    #[arg(long, default_value = "data/reference.toml")]
    reference: PathBuf,

    /// Scan result for this cycle
    #[arg(long, default_value = "data/scan.toml")]
    scan: PathBuf,

    /// Plan settings; defaults buy nothing
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Budget override; otherwise the scanned budget is used
    #[arg(long)]
    budget: Option<u32>,

    /// Planner configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Log every pricing and propagation decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "skill_planner=debug"
    } else {
        "skill_planner=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let settings = match &args.settings {
        Some(path) => PlanSettings::load(path)?,
        None => PlanSettings::default(),
    };

    let store = load_reference_table(&args.reference)?;
    let planner = Planner::new(store, config);
    for diagnostic in planner.chains().diagnostics() {
        tracing::warn!("Reference table: {}", diagnostic);
    }

    let scan = ScanResult::load(&args.scan)?;
    let list = planner.plan_cycle(&scan, args.budget, &settings)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&list)?),
        "text" => println!("{}", list),
        other => {
            return Err(PlanError::InvalidConfig(format!(
                "unknown output format \"{}\" (expected text or json)",
                other
            )))
        }
    }

    Ok(())
}
