//! Human-readable report output.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use rotaforge::{RotationReport, SolveStatus};

pub fn print_report(report: &RotationReport) {
    if let Some(label) = &report.label {
        println!("{}", format!("Rotation ({})", label).bright_white().bold());
    }
    println!(
        "{}",
        format!("{:>5} {:>8} {:>11}  Ability", "Tick", "Time", "Adrenaline").bright_black()
    );
    for entry in &report.entries {
        let buffed = report.multipliers.get(entry.tick).is_some_and(|&m| m > 1);
        let name = if buffed {
            entry.ability_name.bright_magenta().to_string()
        } else {
            entry.ability_name.to_string()
        };
        println!(
            "{:>5} {:>7.1}s {:>11}  {}",
            entry.tick,
            report.start_seconds(entry),
            entry.resource_after,
            name
        );
    }

    println!();
    println!(
        "Total damage: {}",
        (report.total_damage.max(0) as u64)
            .to_formatted_string(&Locale::en)
            .bright_green()
            .bold()
    );
    let status = match report.status {
        SolveStatus::Optimal => report.status.as_str().bright_green().to_string(),
        SolveStatus::Feasible | SolveStatus::Timeout => {
            format!("{} (not proven optimal)", report.status).yellow().to_string()
        }
        SolveStatus::Infeasible => report.status.as_str().bright_red().to_string(),
    };
    println!("Solver status: {}", status);
    println!(
        "Search: {} nodes, {} conflicts, {:.3}s",
        report.stats.nodes.to_formatted_string(&Locale::en),
        report.stats.conflicts.to_formatted_string(&Locale::en),
        report.wall_time.as_secs_f64()
    );
}
