mod analysis;
mod config;
mod data;
mod loader;
mod logging;
mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use analysis::{build_legs, detect_swings};
use config::AppConfig;
use loader::{load_bars_from_csv, parse_timezone, validate_series};
use output::{print_report, write_swings_csv};

fn main() -> Result<()> {
    let config = AppConfig::parse();
    logging::init_logging(config.log_level);
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    let input_path = &config.input_path;
    if !input_path.exists() {
        bail!("input file {:?} does not exist", input_path);
    }

    let tz = parse_timezone(&config.timezone)?;
    let bars = load_bars_from_csv(input_path, tz)
        .with_context(|| format!("failed to load input data from {:?}", input_path))?;
    validate_series(&bars)?;

    if let (Some(first), Some(last)) = (
        bars.first().and_then(|bar| bar.timestamp),
        bars.last().and_then(|bar| bar.timestamp),
    ) {
        info!(
            bars = bars.len(),
            start = %first.format("%Y-%m-%d %H:%M"),
            end = %last.format("%Y-%m-%d %H:%M"),
            timezone = %tz,
            "loaded bars"
        );
    }

    let swings = detect_swings(&bars, config.radius)
        .with_context(|| format!("swing detection failed with radius {}", config.radius))?;
    let legs = build_legs(&swings);
    info!(swings = swings.len(), legs = legs.len(), "detected swings");

    print_report(&swings, &legs, bars.len(), config.radius);

    if let Some(output_path) = &config.output_path {
        write_swings_csv(output_path, &swings)
            .with_context(|| format!("failed to export swings to {:?}", output_path))?;
        info!(path = %output_path.display(), "wrote swing points");
    }

    Ok(())
}
