//! `rotaforge` - plan a damage-maximizing ability rotation for one combat style.

mod args;
mod output;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use rotaforge::{CombatStyle, RotaforgeConfig, RotaforgeError, RotationPlanner, RotationRequest};

use args::Args;

const DEFAULT_CONFIG: &str = "rotaforge.toml";

fn main() -> ExitCode {
    let args = Args::parse();
    if !args.quiet {
        rotaforge::console::init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), RotaforgeError> {
    let style: CombatStyle = args.style.parse()?;

    let mut config = match &args.config {
        Some(path) => RotaforgeConfig::load(path)?,
        None => RotaforgeConfig::load(DEFAULT_CONFIG).unwrap_or_default(),
    };
    if let Some(seconds) = args.time_limit {
        config = config.with_termination_seconds(seconds);
    }
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }

    let mut request =
        RotationRequest::new(args.seconds, args.start_adrenaline).labeled(style.as_str());
    for pin in &args.pins {
        request = request.pin(pin.tick, pin.ability.clone());
    }

    let planner = RotationPlanner::from_config(&config)?;
    let report = planner.plan_style(config.data_dir(), style, &request)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{}", json);
    } else {
        output::print_report(&report);
    }
    Ok(())
}
