//! Rotation reports.

use std::fmt;
use std::time::Duration;

use rotaforge_solver::{SolveStatus, SolverStats};
use serde::Serialize;

/// One ability start in a rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationEntry {
    pub tick: usize,
    /// Meter level after the tick resolves.
    pub resource_after: i64,
    pub ability_name: String,
}

/// A decoded, verified rotation plus solve statistics.
///
/// A report whose status is not [`SolveStatus::Optimal`] is still a valid
/// rotation, it is just not proven best.
#[derive(Debug, Clone, Serialize)]
pub struct RotationReport {
    /// Optional request label, such as the combat style.
    pub label: Option<String>,
    pub entries: Vec<RotationEntry>,
    /// `r[t]` for every tick.
    pub resource_trace: Vec<i64>,
    /// `m[t]` for every tick.
    pub multipliers: Vec<i64>,
    pub total_damage: i64,
    pub status: SolveStatus,
    /// Encode, solve and decode time.
    pub wall_time: Duration,
    pub ticks: usize,
    pub tick_length: f64,
    pub stats: SolverStats,
}

impl RotationReport {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// True when the solver stopped before proving optimality.
    pub fn is_suboptimal(&self) -> bool {
        !self.is_optimal()
    }

    /// Seconds into the fight at which `entry` starts.
    pub fn start_seconds(&self, entry: &RotationEntry) -> f64 {
        entry.tick as f64 * self.tick_length
    }
}

impl fmt::Display for RotationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            writeln!(f, "{}", label)?;
        }
        writeln!(f, "{:>5} {:>8} {:>11}  Ability", "Tick", "Time", "Adrenaline")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:>5} {:>7.1}s {:>11}  {}",
                entry.tick,
                self.start_seconds(entry),
                entry.resource_after,
                entry.ability_name
            )?;
        }
        write!(
            f,
            "Total damage: {} ({}, {} ticks, {:.3}s)",
            self.total_damage,
            self.status,
            self.ticks,
            self.wall_time.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: SolveStatus) -> RotationReport {
        RotationReport {
            label: Some("melee".to_string()),
            entries: vec![RotationEntry {
                tick: 2,
                resource_after: 18,
                ability_name: "Slice".to_string(),
            }],
            resource_trace: vec![9, 9, 18],
            multipliers: vec![1, 1, 1],
            total_damage: 60,
            status,
            wall_time: Duration::from_millis(12),
            ticks: 3,
            tick_length: 0.6,
            stats: SolverStats::default(),
        }
    }

    #[test]
    fn test_timeout_is_suboptimal() {
        assert!(report(SolveStatus::Timeout).is_suboptimal());
        assert!(report(SolveStatus::Feasible).is_suboptimal());
        assert!(report(SolveStatus::Optimal).is_optimal());
    }

    #[test]
    fn test_display_lists_entries() {
        let text = report(SolveStatus::Optimal).to_string();
        assert!(text.starts_with("melee\n"));
        assert!(text.contains("Slice"));
        assert!(text.contains("1.2s"));
        assert!(text.contains("Total damage: 60 (OPTIMAL, 3 ticks"));
    }
}
