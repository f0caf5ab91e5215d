//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use rotaforge::Pin;

/// RotaForge - plan a damage-maximizing ability rotation
#[derive(Parser, Debug)]
#[command(name = "rotaforge", version)]
#[command(about = "Plan a damage-maximizing ability rotation for one combat style")]
pub struct Args {
    /// Fight length in seconds
    #[arg(long, default_value_t = 20.0)]
    pub seconds: f64,

    /// Adrenaline at the start of the fight, 0 to 100
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    pub start_adrenaline: i64,

    /// Combat style: magic, melee or ranged
    #[arg(long, default_value = "melee")]
    pub style: String,

    /// TOML or YAML configuration file (default: ./rotaforge.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding {style}_data.csv catalogs
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Solver time limit in seconds; full catalogs over 20 s usually stop here
    /// with status TIMEOUT
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Force an ability to start on a tick, as TICK:NAME (repeatable)
    #[arg(long = "pin", value_parser = parse_pin)]
    pub pins: Vec<Pin>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn parse_pin(value: &str) -> Result<Pin, String> {
    let (tick, name) = value
        .split_once(':')
        .ok_or_else(|| format!("expected TICK:NAME, got '{}'", value))?;
    let tick = tick
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a tick number", tick.trim()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("pinned ability name is empty".to_string());
    }
    Ok(Pin::new(tick, name))
}
