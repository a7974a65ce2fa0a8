//! Run the buy-versus-rent comparison for every holding horizon from 1 year
//! up to a maximum and report where buying overtakes renting.
//!
//! Usage: cargo run --release --bin horizon_sweep -- --max-years 30

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use buy_or_rent::{breakeven_horizon, report, ScenarioInput, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "horizon_sweep", version, about = "Sweep holding horizons for one scenario")]
struct Args {
    /// JSON scenario file (defaults to the reference scenario)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Longest horizon to evaluate, in years
    #[arg(long, default_value_t = 30)]
    max_years: u32,

    /// Output CSV path
    #[arg(long, default_value = "horizon_sweep.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let input = match &args.config {
        Some(path) => ScenarioInput::from_json_file(path)
            .with_context(|| format!("reading scenario from {}", path.display()))?,
        None => ScenarioInput::default(),
    };
    let runner = ScenarioRunner::from_input(input).context("invalid scenario")?;

    println!("Running horizons 1..={} years...", args.max_years);
    let rows = runner.sweep_horizons(1..=args.max_years)?;
    println!("Sweep complete in {:?}", start.elapsed());

    println!(
        "{:>5} {:>16} {:>16} {:>16} {:>9} {:>9}",
        "Years", "Buy FV", "Rent FV", "Difference", "Preferred", "Buy IRR"
    );
    println!("{}", "-".repeat(76));
    for row in &rows {
        let irr = row
            .buy_irr
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:>5} {:>16.2} {:>16.2} {:>16.2} {:>9} {:>9}",
            row.horizon_years,
            row.buy_future_value,
            row.rent_future_value,
            row.difference,
            row.preferred.to_string(),
            irr,
        );
    }

    match breakeven_horizon(&rows) {
        Some(years) => println!("\nBuying breaks even at a {}-year horizon", years),
        None => println!("\nRenting stays ahead for every horizon up to {} years", args.max_years),
    }

    report::write_sweep_file(&args.output, &rows)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Output written to {}", args.output.display());

    Ok(())
}
