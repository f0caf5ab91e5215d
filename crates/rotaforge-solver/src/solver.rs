//! The solver boundary.

use std::time::Duration;

use crate::model::{Model, ModelError};
use crate::response::SolveResponse;

/// Anything that can solve a [`Model`] within a time limit.
///
/// Implementations must return once `time_limit` has elapsed, handing back
/// the best assignment found so far with [`SolveStatus::Timeout`].
///
/// [`SolveStatus::Timeout`]: crate::SolveStatus::Timeout
pub trait Solver: Send + Sync {
    /// Solves `model`. Fails only when the model itself is malformed.
    fn solve(&self, model: &Model, time_limit: Duration) -> Result<SolveResponse, ModelError>;

    /// Returns the solver name used in logs.
    fn solver_name(&self) -> &'static str;
}
