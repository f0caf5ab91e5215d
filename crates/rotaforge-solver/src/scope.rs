//! Per-solve search scope.

use std::time::{Duration, Instant};

use crate::model::Assignment;
use crate::stats::SolverStats;

/// State owned by a single solve call.
///
/// Holds the clock, the statistics and the incumbent. A scope is never
/// shared between solves.
#[derive(Debug)]
pub struct SearchScope {
    start_time: Instant,
    stats: SolverStats,
    best: Option<(i64, Assignment)>,
}

impl SearchScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            stats: SolverStats::default(),
            best: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolverStats {
        &mut self.stats
    }

    pub fn best_objective(&self) -> Option<i64> {
        self.best.as_ref().map(|(objective, _)| *objective)
    }

    pub fn has_incumbent(&self) -> bool {
        self.best.is_some()
    }

    /// Replaces the incumbent.
    pub fn update_best(&mut self, objective: i64, assignment: Assignment) {
        self.stats.record_solution();
        self.best = Some((objective, assignment));
    }

    /// Stops the clock and hands back the incumbent and statistics.
    pub fn finish(mut self) -> (Option<(i64, Assignment)>, SolverStats) {
        self.stats.elapsed = self.start_time.elapsed();
        (self.best, self.stats)
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::new()
    }
}
