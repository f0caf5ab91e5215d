//! Exact depth-first branch-and-bound.
//!
//! The search keeps an explicit stack of nodes, each holding a copy of the
//! variable bounds. At every node the bounds are propagated to a fixpoint;
//! a conflict closes the node. Otherwise the first unfixed variable (in
//! decision order, then by index) is split into `v == hi` and `v <= hi - 1`,
//! trying the high value first.
//!
//! Every improving solution posts an objective cut, so later nodes whose
//! bounds cannot beat the incumbent fail during propagation. Exhausting the
//! tree proves optimality (or infeasibility).

mod node;
mod propagator;


use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::model::{Model, ModelError, VarId};
use crate::response::{Diagnostics, SolveResponse, SolveStatus};
use crate::scope::SearchScope;
use crate::solver::Solver;
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, StopKind, TimeTermination,
};

use node::{Decision, Domains, SearchNode};
use propagator::Propagator;

/// Configuration for the branch-and-bound engine.
#[derive(Debug, Clone)]
pub struct BranchAndBoundConfig {
    /// Maximum number of nodes to explore (None = unlimited).
    pub node_limit: Option<u64>,
    /// Stop at the first solution instead of proving optimality.
    pub stop_at_first_solution: bool,
    /// How many frequent conflicts to list in diagnostics.
    pub conflict_report_size: usize,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            stop_at_first_solution: false,
            conflict_report_size: 3,
        }
    }
}

/// Exact branch-and-bound solver.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rotaforge_solver::model::{LinearExpr, Model};
/// use rotaforge_solver::{BranchAndBound, SolveStatus, Solver};
///
/// let mut model = Model::new();
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_le(LinearExpr::sum([a, b]), 1);
/// model.maximize(LinearExpr::new().term(a, 3).term(b, 5));
///
/// let response = BranchAndBound::default()
///     .solve(&model, Duration::from_secs(5))
///     .unwrap();
/// assert_eq!(response.status, SolveStatus::Optimal);
/// assert_eq!(response.objective, Some(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: BranchAndBoundConfig,
    terminate_flag: Option<Arc<AtomicBool>>,
}

/// How the search loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchEnd {
    Exhausted,
    RootConflict(usize),
    Stopped(StopKind),
    FirstSolution,
}

impl BranchAndBound {
    pub fn new(config: BranchAndBoundConfig) -> Self {
        Self {
            config,
            terminate_flag: None,
        }
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.config.node_limit = Some(limit);
        self
    }

    /// Stops at the first solution, reported as [`SolveStatus::Feasible`].
    pub fn first_solution(mut self) -> Self {
        self.config.stop_at_first_solution = true;
        self
    }

    /// Stops the search when `flag` is set, keeping the incumbent.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }

    fn termination(&self, time_limit: Duration) -> OrTermination {
        let mut termination = OrTermination::new().with(TimeTermination::new(time_limit));
        if let Some(limit) = self.config.node_limit {
            termination = termination.with(NodeCountTermination::new(limit));
        }
        if let Some(flag) = &self.terminate_flag {
            termination = termination.with(ExternalTermination::new(flag.clone()));
        }
        termination
    }

    fn search(
        &self,
        model: &Model,
        propagator: &mut Propagator<'_>,
        termination: &OrTermination,
        scope: &mut SearchScope,
    ) -> SearchEnd {
        let mut root = Domains::from_model(model);
        scope.stats_mut().record_node();
        if let Err(idx) = propagator.propagate_all(&mut root) {
            scope.stats_mut().record_conflict();
            return SearchEnd::RootConflict(idx);
        }

        let mut stack = vec![SearchNode::root(root)];
        while let Some(node) = stack.pop() {
            if let Some(kind) = termination.check(scope) {
                return SearchEnd::Stopped(kind);
            }

            let SearchNode {
                mut domains,
                decision,
                depth,
            } = node;
            if let Some(decision) = decision {
                scope.stats_mut().record_node();
                if decision.apply(&mut domains).is_err() {
                    scope.stats_mut().record_conflict();
                    continue;
                }
                if let Err(idx) = propagator.propagate_from(&mut domains, decision.var()) {
                    scope.stats_mut().record_conflict();
                    trace!(
                        event = "conflict",
                        constraint = idx,
                        depth = depth,
                        nodes = scope.stats().nodes,
                    );
                    continue;
                }
            }

            match select_branch_var(model, &domains) {
                Some(var) => {
                    let hi = domains.hi(var);
                    stack.push(SearchNode::child(
                        domains.clone(),
                        Decision::AtMost { var, value: hi - 1 },
                        depth + 1,
                    ));
                    stack.push(SearchNode::child(
                        domains,
                        Decision::Fix { var, value: hi },
                        depth + 1,
                    ));
                }
                None => {
                    let assignment = domains.to_assignment();
                    if let Err(violation) = model.check(&assignment) {
                        warn!(
                            event = "rejected_solution",
                            reason = %violation,
                            depth = depth,
                        );
                        scope.stats_mut().record_conflict();
                        continue;
                    }
                    let Some(objective) = model.objective() else {
                        scope.update_best(0, assignment);
                        return SearchEnd::Exhausted;
                    };
                    let value = objective.value(&assignment);
                    if scope
                        .best_objective()
                        .is_some_and(|best| !objective.improves(value, best))
                    {
                        continue;
                    }
                    debug!(
                        event = "incumbent",
                        objective = value,
                        nodes = scope.stats().nodes,
                        depth = depth,
                        elapsed_ms = scope.elapsed().as_millis() as u64,
                    );
                    scope.update_best(value, assignment);
                    propagator.set_cut(value);
                    if self.config.stop_at_first_solution {
                        return SearchEnd::FirstSolution;
                    }
                }
            }
        }
        SearchEnd::Exhausted
    }

    fn diagnostics(
        &self,
        model: &Model,
        propagator: &Propagator<'_>,
        end: SearchEnd,
    ) -> Diagnostics {
        let label = |idx: usize| {
            if idx == propagator.cut_index() {
                "objective bound".to_string()
            } else {
                model.constraint_label(idx)
            }
        };
        let mut counted: Vec<(usize, u64)> = propagator
            .conflict_counts()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(idx, &count)| (idx, count))
            .collect();
        counted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let root_conflict = match end {
            SearchEnd::RootConflict(idx) => Some(label(idx)),
            _ => None,
        };
        let frequent_conflicts = counted
            .into_iter()
            .filter(|&(idx, _)| Some(idx) != end.root_conflict())
            .take(self.config.conflict_report_size)
            .map(|(idx, count)| (label(idx), count))
            .collect();
        Diagnostics {
            root_conflict,
            frequent_conflicts,
        }
    }
}

impl SearchEnd {
    fn root_conflict(self) -> Option<usize> {
        match self {
            SearchEnd::RootConflict(idx) => Some(idx),
            _ => None,
        }
    }
}

/// First unfixed variable in decision order, then by index.
fn select_branch_var(model: &Model, domains: &Domains) -> Option<VarId> {
    model
        .decision_order()
        .iter()
        .copied()
        .find(|&v| !domains.is_fixed(v))
        .or_else(|| {
            (0..model.num_vars())
                .map(VarId)
                .find(|&v| !domains.is_fixed(v))
        })
}

impl Solver for BranchAndBound {
    fn solve(&self, model: &Model, time_limit: Duration) -> Result<SolveResponse, ModelError> {
        model.validate()?;

        info!(
            event = "solve_start",
            solver = self.solver_name(),
            variables = model.num_vars(),
            constraints = model.num_constraints(),
            time_limit_secs = time_limit.as_secs_f64(),
        );

        let termination = self.termination(time_limit);
        let mut propagator = Propagator::new(model);
        let mut scope = SearchScope::new();
        let end = self.search(model, &mut propagator, &termination, &mut scope);

        let has_incumbent = scope.has_incumbent();
        let status = match end {
            SearchEnd::Exhausted if has_incumbent => SolveStatus::Optimal,
            SearchEnd::Exhausted | SearchEnd::RootConflict(_) => SolveStatus::Infeasible,
            SearchEnd::FirstSolution => SolveStatus::Feasible,
            SearchEnd::Stopped(StopKind::External) if has_incumbent => SolveStatus::Feasible,
            SearchEnd::Stopped(_) => SolveStatus::Timeout,
        };
        let diagnostics = if has_incumbent {
            Diagnostics::default()
        } else {
            self.diagnostics(model, &propagator, end)
        };

        let propagations = propagator.propagations();
        let (best, mut stats) = scope.finish();
        stats.propagations = propagations;
        let (objective, assignment) = match best {
            Some((objective, assignment)) => (Some(objective), Some(assignment)),
            None => (None, None),
        };

        info!(
            event = "solve_end",
            status = %status,
            objective = %objective.map_or_else(|| "none".to_string(), |o| o.to_string()),
            nodes = stats.nodes,
            conflicts = stats.conflicts,
            solutions = stats.solutions,
            duration_ms = stats.elapsed.as_millis() as u64,
        );

        Ok(SolveResponse {
            status,
            assignment,
            objective,
            diagnostics,
            stats,
        })
    }

    fn solver_name(&self) -> &'static str {
        "BranchAndBound"
    }
}
