//! Parallel batches of independent plans.

use rayon::prelude::*;
use rotaforge_core::{AbilityCatalog, Result};
use rotaforge_solver::Solver;
use tracing::info;

use crate::report::RotationReport;
use crate::rotation::{RotationPlanner, RotationRequest};

/// One catalog and request to plan.
#[derive(Debug, Clone)]
pub struct BatchJob<'a> {
    pub catalog: &'a AbilityCatalog,
    pub request: RotationRequest,
}

impl<'a> BatchJob<'a> {
    pub fn new(catalog: &'a AbilityCatalog, request: RotationRequest) -> Self {
        Self { catalog, request }
    }
}

/// Plans every job on the rayon pool.
///
/// Each job gets its own model and search state. Results come back in job
/// order and a failing job does not affect the others.
pub fn solve_batch<S: Solver>(
    planner: &RotationPlanner<S>,
    jobs: &[BatchJob<'_>],
) -> Vec<Result<RotationReport>> {
    info!(event = "batch_start", requests = jobs.len());
    jobs.par_iter()
        .map(|job| planner.plan(job.catalog, &job.request))
        .collect()
}
