//! Solve outcomes.

use std::fmt;

use serde::Serialize;

use crate::model::Assignment;
use crate::stats::SolverStats;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// The assignment is proven optimal.
    Optimal,
    /// An assignment was found but optimality was not proven.
    Feasible,
    /// No assignment satisfies the model.
    Infeasible,
    /// The time or node budget ran out. An assignment may still be present.
    Timeout,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the solver can say about why a model failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Constraint that failed before any branching, if any.
    pub root_conflict: Option<String>,
    /// Constraints that closed the most search nodes, most frequent first.
    pub frequent_conflicts: Vec<(String, u64)>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.root_conflict.is_none() && self.frequent_conflicts.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = &self.root_conflict {
            write!(f, "conflict before search: {}", root)?;
            if !self.frequent_conflicts.is_empty() {
                write!(f, "; ")?;
            }
        }
        if !self.frequent_conflicts.is_empty() {
            write!(f, "most frequent conflicts: ")?;
            for (i, (name, count)) in self.frequent_conflicts.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} ({}x)", name, count)?;
            }
        }
        if self.is_empty() {
            write!(f, "no diagnostics available")?;
        }
        Ok(())
    }
}

/// Result of [`Solver::solve`](crate::Solver::solve).
#[derive(Debug, Clone)]
pub struct SolveResponse {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    /// Objective value of `assignment`.
    pub objective: Option<i64>,
    pub diagnostics: Diagnostics,
    pub stats: SolverStats,
}

impl SolveResponse {
    /// Whether the response carries an assignment to decode.
    pub fn has_solution(&self) -> bool {
        self.assignment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "OPTIMAL");
        assert_eq!(SolveStatus::Timeout.to_string(), "TIMEOUT");
    }

    #[test]
    fn test_diagnostics_display() {
        let diagnostics = Diagnostics {
            root_conflict: Some("pin".to_string()),
            frequent_conflicts: vec![("cooldown".to_string(), 4), ("busy".to_string(), 2)],
        };
        assert_eq!(
            diagnostics.to_string(),
            "conflict before search: pin; most frequent conflicts: cooldown (4x), busy (2x)"
        );
        assert_eq!(
            Diagnostics::default().to_string(),
            "no diagnostics available"
        );
    }
}
