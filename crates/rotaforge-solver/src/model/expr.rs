//! Linear expressions.

use super::VarId;

/// A linear expression `Σ c·v + k`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `vars`, each with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self::weighted_sum(vars.into_iter().map(|v| (v, 1)))
    }

    /// Sum of `c·v` over `terms`.
    pub fn weighted_sum(terms: impl IntoIterator<Item = (VarId, i64)>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant: 0,
        }
    }

    pub fn term(mut self, var: VarId, coef: i64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn plus(mut self, constant: i64) -> Self {
        self.constant += constant;
        self
    }

    pub fn add_term(&mut self, var: VarId, coef: i64) {
        self.terms.push((var, coef));
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    /// Merges repeated variables and drops zero coefficients.
    pub(crate) fn into_normalized(mut self) -> (Vec<(VarId, i64)>, i64) {
        self.terms.sort_by_key(|&(v, _)| v);
        let mut merged: Vec<(VarId, i64)> = Vec::with_capacity(self.terms.len());
        for (var, coef) in self.terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == var => *acc += coef,
                _ => merged.push((var, coef)),
            }
        }
        merged.retain(|&(_, c)| c != 0);
        (merged, self.constant)
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::new().term(var, 1)
    }
}
