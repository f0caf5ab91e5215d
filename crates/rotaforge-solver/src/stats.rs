//! Search statistics.

use std::time::Duration;

use serde::Serialize;

/// Counters collected over one solve.
///
/// # Example
///
/// ```
/// use rotaforge_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.record_node();
/// stats.record_node();
/// stats.record_conflict();
/// stats.record_solution();
///
/// assert_eq!(stats.nodes, 2);
/// assert_eq!(stats.conflicts, 1);
/// assert_eq!(stats.solutions, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SolverStats {
    /// Search nodes explored.
    pub nodes: u64,
    /// Nodes closed by a propagation conflict.
    pub conflicts: u64,
    /// Improving solutions found.
    pub solutions: u64,
    /// Constraint propagator invocations.
    pub propagations: u64,
    /// Wall time spent in the solver.
    pub elapsed: Duration,
}

impl SolverStats {
    pub fn record_node(&mut self) {
        self.nodes += 1;
    }

    pub fn record_conflict(&mut self) {
        self.conflicts += 1;
    }

    pub fn record_solution(&mut self) {
        self.solutions += 1;
    }

    pub fn record_propagation(&mut self) {
        self.propagations += 1;
    }

    /// Returns the nodes per second rate.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}
