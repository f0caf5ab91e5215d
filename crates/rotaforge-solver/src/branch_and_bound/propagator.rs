//! Bounds propagation over linear constraints.
//!
//! Each constraint is watched by every variable it mentions, including the
//! variables behind its enforcement literals. When a bound changes, the
//! watching constraints are queued and re-examined until nothing changes
//! (a fixpoint) or some constraint fails.
//!
//! An enforced constraint tightens the bounds of its terms. A constraint
//! with exactly one undecided enforcement literal that can no longer hold
//! forces that literal false (half-reification).

use std::collections::VecDeque;

use crate::model::{Literal, Model, Relation, Sense, VarId};

use super::node::{Domains, EmptyDomain};

/// A linear row: either a model constraint or the objective cut.
#[derive(Clone, Copy)]
struct Row<'m> {
    terms: &'m [(VarId, i64)],
    relation: Relation,
    rhs: i128,
    enforcement: &'m [Literal],
}

/// Queue-driven propagator for one model.
pub(crate) struct Propagator<'m> {
    model: &'m Model,
    watchers: Vec<Vec<usize>>,
    cut_rhs: Option<i128>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    conflict_counts: Vec<u64>,
    propagations: u64,
}

impl<'m> Propagator<'m> {
    pub(crate) fn new(model: &'m Model) -> Self {
        let rows = model.num_constraints() + 1;
        let mut watchers: Vec<Vec<usize>> = vec![Vec::new(); model.num_vars()];
        for (idx, c) in model.constraints().iter().enumerate() {
            let vars = c
                .terms()
                .iter()
                .map(|&(v, _)| v)
                .chain(c.enforcement().iter().map(|lit| lit.var()));
            for v in vars {
                let list = &mut watchers[v.index()];
                if list.last() != Some(&idx) {
                    list.push(idx);
                }
            }
        }
        if let Some(objective) = model.objective() {
            let cut = model.num_constraints();
            for &(v, _) in objective.terms() {
                watchers[v.index()].push(cut);
            }
        }
        Self {
            model,
            watchers,
            cut_rhs: None,
            queue: VecDeque::new(),
            queued: vec![false; rows],
            conflict_counts: vec![0; rows],
            propagations: 0,
        }
    }

    /// Row index used for the objective cut.
    #[inline]
    pub(crate) fn cut_index(&self) -> usize {
        self.model.num_constraints()
    }

    /// Requires every later solution to improve on `best`.
    pub(crate) fn set_cut(&mut self, best: i64) {
        if let Some(objective) = self.model.objective() {
            let rhs = match objective.sense() {
                Sense::Maximize => best as i128 + 1,
                Sense::Minimize => best as i128 - 1,
            };
            self.cut_rhs = Some(rhs - objective.constant() as i128);
        }
    }

    pub(crate) fn propagations(&self) -> u64 {
        self.propagations
    }

    /// How often each row closed a node. The last entry is the objective cut.
    pub(crate) fn conflict_counts(&self) -> &[u64] {
        &self.conflict_counts
    }

    fn row(&self, idx: usize) -> Option<Row<'m>> {
        let model = self.model;
        if let Some(c) = model.constraints().get(idx) {
            return Some(Row {
                terms: c.terms(),
                relation: c.relation(),
                rhs: c.rhs() as i128,
                enforcement: c.enforcement(),
            });
        }
        let objective = model.objective()?;
        let rhs = self.cut_rhs?;
        let relation = match objective.sense() {
            Sense::Maximize => Relation::Ge,
            Sense::Minimize => Relation::Le,
        };
        Some(Row {
            terms: objective.terms(),
            relation,
            rhs,
            enforcement: &[],
        })
    }

    /// Propagates every row to a fixpoint.
    pub(crate) fn propagate_all(&mut self, domains: &mut Domains) -> Result<(), usize> {
        for idx in 0..=self.cut_index() {
            self.enqueue(idx);
        }
        self.run(domains)
    }

    /// Propagates after `var` changed, always re-checking the objective cut.
    pub(crate) fn propagate_from(&mut self, domains: &mut Domains, var: VarId) -> Result<(), usize> {
        self.enqueue_watchers(var);
        let cut = self.cut_index();
        self.enqueue(cut);
        self.run(domains)
    }

    fn enqueue(&mut self, idx: usize) {
        if !self.queued[idx] {
            self.queued[idx] = true;
            self.queue.push_back(idx);
        }
    }

    fn enqueue_watchers(&mut self, var: VarId) {
        for i in 0..self.watchers[var.index()].len() {
            let idx = self.watchers[var.index()][i];
            self.enqueue(idx);
        }
    }

    fn run(&mut self, domains: &mut Domains) -> Result<(), usize> {
        while let Some(idx) = self.queue.pop_front() {
            self.queued[idx] = false;
            self.propagations += 1;
            if self.propagate_row(idx, domains).is_err() {
                for idx in self.queue.drain(..) {
                    self.queued[idx] = false;
                }
                self.conflict_counts[idx] += 1;
                return Err(idx);
            }
        }
        Ok(())
    }

    fn propagate_row(&mut self, idx: usize, domains: &mut Domains) -> Result<(), EmptyDomain> {
        let Some(row) = self.row(idx) else {
            return Ok(());
        };

        let mut undecided: Option<Literal> = None;
        let mut undecided_count = 0;
        for &lit in row.enforcement {
            match domains.literal_value(lit) {
                Some(false) => return Ok(()),
                Some(true) => {}
                None => {
                    undecided_count += 1;
                    undecided = Some(lit);
                }
            }
        }

        let (min, max) = domains.sum_bounds(row.terms);
        let violated = match row.relation {
            Relation::Le => min > row.rhs,
            Relation::Ge => max < row.rhs,
            Relation::Eq => min > row.rhs || max < row.rhs,
        };
        if violated {
            return match (undecided_count, undecided) {
                (0, _) => Err(EmptyDomain),
                (1, Some(lit)) => {
                    if domains.falsify(lit)? {
                        self.enqueue_watchers(lit.var());
                    }
                    Ok(())
                }
                _ => Ok(()),
            };
        }
        if undecided_count > 0 {
            return Ok(());
        }

        if matches!(row.relation, Relation::Le | Relation::Eq) {
            self.tighten(domains, row.terms, 1, row.rhs)?;
        }
        if matches!(row.relation, Relation::Ge | Relation::Eq) {
            self.tighten(domains, row.terms, -1, -row.rhs)?;
        }
        Ok(())
    }

    /// Tightens bounds so that `Σ sign·c·v <= rhs` stays satisfiable.
    fn tighten(
        &mut self,
        domains: &mut Domains,
        terms: &[(VarId, i64)],
        sign: i128,
        rhs: i128,
    ) -> Result<(), EmptyDomain> {
        let term_min = |domains: &Domains, v: VarId, c: i128| {
            if c > 0 {
                c * domains.lo(v) as i128
            } else {
                c * domains.hi(v) as i128
            }
        };
        let min: i128 = terms
            .iter()
            .map(|&(v, c)| term_min(domains, v, sign * c as i128))
            .sum();
        if min > rhs {
            return Err(EmptyDomain);
        }

        for &(v, c) in terms {
            let c = sign * c as i128;
            let slack = rhs - (min - term_min(domains, v, c));
            // Tightening hi for c > 0 (lo for c < 0) leaves term_min unchanged.
            let changed = if c > 0 {
                domains.set_hi(v, slack.div_euclid(c))?
            } else {
                domains.set_lo(v, -slack.div_euclid(-c))?
            };
            if changed {
                self.enqueue_watchers(v);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearExpr;

    #[test]
    fn test_le_tightens_upper_bounds() {
        let mut model = Model::new();
        let x = model.new_int_var(0, 10, "x");
        let y = model.new_int_var(2, 10, "y");
        model.add_le(LinearExpr::new().term(x, 2).term(y, 1), 9);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert!(propagator.propagate_all(&mut domains).is_ok());

        // 2x <= 9 - 2  =>  x <= 3;  y <= 9
        assert_eq!(domains.hi(x), 3);
        assert_eq!(domains.hi(y), 9);
    }

    #[test]
    fn test_negative_coefficient_raises_lower_bound() {
        let mut model = Model::new();
        let x = model.new_int_var(0, 10, "x");
        let y = model.new_int_var(0, 10, "y");
        // y - x <= -3  =>  x >= 3, y <= 7
        model.add_le(LinearExpr::new().term(y, 1).term(x, -1), -3);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert!(propagator.propagate_all(&mut domains).is_ok());

        assert_eq!(domains.lo(x), 3);
        assert_eq!(domains.hi(y), 7);
    }

    #[test]
    fn test_equality_fixes_chain() {
        let mut model = Model::new();
        let a = model.new_constant(40, "a");
        let b = model.new_int_var(0, 100, "b");
        let c = model.new_int_var(0, 100, "c");
        model.add_eq(LinearExpr::new().term(b, 1).term(a, -1), 9);
        model.add_eq(LinearExpr::new().term(c, 1).term(b, -1), 9);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert!(propagator.propagate_all(&mut domains).is_ok());

        assert!(domains.is_fixed(c));
        assert_eq!(domains.lo(c), 58);
    }

    #[test]
    fn test_half_reification_falsifies_literal() {
        let mut model = Model::new();
        let start = model.new_bool_var("start");
        let level = model.new_constant(40, "level");
        model
            .add_ge(level, 50)
            .only_enforce_if([Literal::from(start)]);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert!(propagator.propagate_all(&mut domains).is_ok());

        assert_eq!(domains.literal_value(start.into()), Some(false));
    }

    #[test]
    fn test_negated_enforcement_literal() {
        let mut model = Model::new();
        let idle = model.new_bool_var("busy");
        let level = model.new_constant(40, "level");
        model.add_ge(level, 50).only_enforce_if([!Literal::from(idle)]);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert!(propagator.propagate_all(&mut domains).is_ok());

        assert_eq!(domains.lo(idle), 1);
    }

    #[test]
    fn test_enforced_violation_is_conflict() {
        let mut model = Model::new();
        let start = model.new_constant(1, "start");
        let level = model.new_constant(40, "level");
        model.add_eq(start, 1);
        model
            .add_ge(level, 50)
            .only_enforce_if([Literal::from(start)]);

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        assert_eq!(propagator.propagate_all(&mut domains), Err(1));
        assert_eq!(propagator.conflict_counts()[1], 1);
    }

    #[test]
    fn test_objective_cut_prunes() {
        let mut model = Model::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.maximize(LinearExpr::new().term(a, 3).term(b, 2));

        let mut domains = Domains::from_model(&model);
        let mut propagator = Propagator::new(&model);
        propagator.set_cut(3);
        // 3a + 2b >= 4 forces both on.
        assert!(propagator.propagate_all(&mut domains).is_ok());
        assert_eq!(domains.lo(a), 1);
        assert_eq!(domains.lo(b), 1);

        propagator.set_cut(5);
        let mut domains = Domains::from_model(&model);
        assert_eq!(
            propagator.propagate_all(&mut domains),
            Err(propagator.cut_index())
        );
    }
}
