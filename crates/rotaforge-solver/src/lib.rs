//! RotaForge Solver
//!
//! A small integer constraint engine:
//! - [`model`]: variables with interval domains, linear constraints with
//!   enforcement literals, and a linear objective
//! - [`Solver`]: the boundary the rotation planner talks to
//! - [`BranchAndBound`]: an exact depth-first branch-and-bound with bounds
//!   propagation
//! - Termination conditions, search statistics and solve responses

pub mod branch_and_bound;
pub mod model;
pub mod response;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;

pub use branch_and_bound::{BranchAndBound, BranchAndBoundConfig};
pub use model::{
    Assignment, Constraint, LinearExpr, Literal, Model, ModelError, Relation, Sense, VarId,
    Violation,
};
pub use response::{Diagnostics, SolveResponse, SolveStatus};
pub use solver::Solver;
pub use stats::SolverStats;
