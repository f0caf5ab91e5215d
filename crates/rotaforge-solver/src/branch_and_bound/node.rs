//! Search nodes and the bounds they carry.

use crate::model::{Assignment, Literal, Model, VarId};

/// A variable's bounds became empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmptyDomain;

/// Current `[lo, hi]` bounds of every variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Domains {
    lo: Vec<i64>,
    hi: Vec<i64>,
}

impl Domains {
    pub(crate) fn from_model(model: &Model) -> Self {
        Self {
            lo: model.variables().iter().map(|v| v.lo()).collect(),
            hi: model.variables().iter().map(|v| v.hi()).collect(),
        }
    }

    #[inline]
    pub(crate) fn lo(&self, var: VarId) -> i64 {
        self.lo[var.index()]
    }

    #[inline]
    pub(crate) fn hi(&self, var: VarId) -> i64 {
        self.hi[var.index()]
    }

    #[inline]
    pub(crate) fn is_fixed(&self, var: VarId) -> bool {
        self.lo(var) == self.hi(var)
    }

    /// Truth value of `lit`, once its variable is fixed.
    pub(crate) fn literal_value(&self, lit: Literal) -> Option<bool> {
        let var = lit.var();
        if self.is_fixed(var) {
            Some(lit.holds(self.lo(var)))
        } else {
            None
        }
    }

    /// Minimum and maximum of `Σ c·v` over the current bounds.
    pub(crate) fn sum_bounds(&self, terms: &[(VarId, i64)]) -> (i128, i128) {
        terms.iter().fold((0i128, 0i128), |(min, max), &(v, c)| {
            let c = c as i128;
            let lo = c * self.lo(v) as i128;
            let hi = c * self.hi(v) as i128;
            (min + lo.min(hi), max + lo.max(hi))
        })
    }

    /// Raises the lower bound. Returns whether it changed.
    pub(crate) fn set_lo(&mut self, var: VarId, value: i128) -> Result<bool, EmptyDomain> {
        let i = var.index();
        if value > self.hi[i] as i128 {
            return Err(EmptyDomain);
        }
        if value <= self.lo[i] as i128 {
            return Ok(false);
        }
        // In range: bounded by hi above.
        self.lo[i] = value as i64;
        Ok(true)
    }

    /// Lowers the upper bound. Returns whether it changed.
    pub(crate) fn set_hi(&mut self, var: VarId, value: i128) -> Result<bool, EmptyDomain> {
        let i = var.index();
        if value < self.lo[i] as i128 {
            return Err(EmptyDomain);
        }
        if value >= self.hi[i] as i128 {
            return Ok(false);
        }
        self.hi[i] = value as i64;
        Ok(true)
    }

    /// Forces `lit` to be false.
    pub(crate) fn falsify(&mut self, lit: Literal) -> Result<bool, EmptyDomain> {
        if lit.is_negated() {
            self.set_lo(lit.var(), 1)
        } else {
            self.set_hi(lit.var(), 0)
        }
    }

    /// The assignment given by the lower bounds.
    pub(crate) fn to_assignment(&self) -> Assignment {
        Assignment::from_values(self.lo.clone())
    }
}

/// Branching decision that created a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// `var == value`, where `value` is the upper bound.
    Fix { var: VarId, value: i64 },
    /// `var <= value`.
    AtMost { var: VarId, value: i64 },
}

impl Decision {
    pub(crate) fn var(&self) -> VarId {
        match *self {
            Decision::Fix { var, .. } | Decision::AtMost { var, .. } => var,
        }
    }

    pub(crate) fn apply(&self, domains: &mut Domains) -> Result<bool, EmptyDomain> {
        match *self {
            Decision::Fix { var, value } => {
                let raised = domains.set_lo(var, value as i128)?;
                let lowered = domains.set_hi(var, value as i128)?;
                Ok(raised || lowered)
            }
            Decision::AtMost { var, value } => domains.set_hi(var, value as i128),
        }
    }
}

/// A pending node in the depth-first search tree.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) domains: Domains,
    pub(crate) decision: Option<Decision>,
    pub(crate) depth: usize,
}

impl SearchNode {
    pub(crate) fn root(domains: Domains) -> Self {
        Self {
            domains,
            decision: None,
            depth: 0,
        }
    }

    pub(crate) fn child(domains: Domains, decision: Decision, depth: usize) -> Self {
        Self {
            domains,
            decision: Some(decision),
            depth,
        }
    }
}
