//! Integer constraint model.
//!
//! A [`Model`] holds bounded integer variables, linear constraints over
//! them and an optional linear objective. Booleans are integer variables
//! with domain `[0, 1]`; a [`Literal`] is a boolean or its negation and is
//! used to make a constraint conditional ("only enforce if").
//!
//! # Example
//!
//! ```
//! use rotaforge_solver::model::{LinearExpr, Model};
//!
//! let mut model = Model::new();
//! let a = model.new_bool_var("a");
//! let b = model.new_bool_var("b");
//! let level = model.new_int_var(0, 100, "level");
//!
//! // a + b <= 1
//! model.add_le(LinearExpr::sum([a, b]), 1).named("exclusive");
//! // level >= 50, only when a holds
//! model.add_ge(level, 50).only_enforce_if([a.into()]);
//! model.maximize(LinearExpr::new().term(a, 3).term(b, 2));
//!
//! assert_eq!(model.num_vars(), 3);
//! assert_eq!(model.num_constraints(), 2);
//! assert!(model.validate().is_ok());
//! ```

mod expr;

#[cfg(test)]
mod tests;

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

pub use expr::LinearExpr;

/// Handle to a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A boolean variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    var: VarId,
    negated: bool,
}

impl Literal {
    pub fn positive(var: VarId) -> Self {
        Self {
            var,
            negated: false,
        }
    }

    pub fn negative(var: VarId) -> Self {
        Self { var, negated: true }
    }

    #[inline]
    pub fn var(self) -> VarId {
        self.var
    }

    #[inline]
    pub fn is_negated(self) -> bool {
        self.negated
    }

    /// Whether the literal holds when its variable takes `value`.
    #[inline]
    pub fn holds(self, value: i64) -> bool {
        (value != 0) != self.negated
    }
}

impl From<VarId> for Literal {
    fn from(var: VarId) -> Self {
        Literal::positive(var)
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self.var,
            negated: !self.negated,
        }
    }
}

/// A model variable with its initial domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    lo: i64,
    hi: i64,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn is_boolean(&self) -> bool {
        self.lo >= 0 && self.hi <= 1
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

/// Comparison between a linear sum and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    pub fn holds(self, lhs: i128, rhs: i128) -> bool {
        match self {
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
            Relation::Eq => lhs == rhs,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "=="),
        }
    }
}

/// A linear constraint `Σ c·v {<=,>=,==} rhs`, active only when every
/// enforcement literal holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: Option<String>,
    terms: Vec<(VarId, i64)>,
    relation: Relation,
    rhs: i64,
    enforcement: SmallVec<[Literal; 2]>,
}

impl Constraint {
    pub(crate) fn new(expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        let (terms, constant) = expr.into_normalized();
        Self {
            name: None,
            terms,
            relation,
            rhs: rhs.saturating_sub(constant),
            enforcement: SmallVec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    pub fn enforcement(&self) -> &[Literal] {
        &self.enforcement
    }

    /// Whether every enforcement literal holds under `assignment`.
    pub fn is_active(&self, assignment: &Assignment) -> bool {
        self.enforcement.iter().all(|&lit| assignment.literal(lit))
    }

    /// Whether the constraint is satisfied by `assignment`.
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        if !self.is_active(assignment) {
            return true;
        }
        let lhs: i128 = self
            .terms
            .iter()
            .map(|&(v, c)| c as i128 * assignment.value(v) as i128)
            .sum();
        self.relation.holds(lhs, self.rhs as i128)
    }
}

/// Builder handle returned when a constraint is added.
pub struct ConstraintRef<'a> {
    constraint: &'a mut Constraint,
}

impl ConstraintRef<'_> {
    /// Makes the constraint conditional on all `literals` holding.
    pub fn only_enforce_if(self, literals: impl IntoIterator<Item = Literal>) -> Self {
        self.constraint.enforcement.extend(literals);
        self
    }

    /// Names the constraint for diagnostics.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.constraint.name = Some(name.into());
        self
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Linear objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    terms: Vec<(VarId, i64)>,
    constant: i64,
    sense: Sense,
}

impl Objective {
    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn value(&self, assignment: &Assignment) -> i64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(v, c)| acc + c * assignment.value(v))
    }

    /// Whether `candidate` strictly improves on `incumbent`.
    pub fn improves(&self, candidate: i64, incumbent: i64) -> bool {
        match self.sense {
            Sense::Maximize => candidate > incumbent,
            Sense::Minimize => candidate < incumbent,
        }
    }
}

/// Model is malformed and cannot be solved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("variable '{name}' has an empty domain [{lo}, {hi}]")]
    EmptyDomain { name: String, lo: i64, hi: i64 },

    #[error("{constraint} references unknown variable #{var}")]
    UnknownVariable { constraint: String, var: usize },

    #[error("{constraint} is enforced by non-boolean variable '{name}'")]
    NonBooleanLiteral { constraint: String, name: String },
}

/// Why an assignment does not satisfy a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("expected {expected} values, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("variable '{name}' = {value} is outside [{lo}, {hi}]")]
    OutOfDomain {
        name: String,
        value: i64,
        lo: i64,
        hi: i64,
    },

    #[error("{constraint} is violated")]
    Constraint { constraint: String },
}

/// A complete value assignment, indexed by variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    pub fn from_values(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Value of `var`; zero for variables outside the assignment.
    #[inline]
    pub fn value(&self, var: VarId) -> i64 {
        self.values.get(var.0).copied().unwrap_or(0)
    }

    #[inline]
    pub fn literal(&self, lit: Literal) -> bool {
        lit.holds(self.value(lit.var))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// An integer constraint model, built once per solve.
#[derive(Debug, Clone, Default)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    decision_order: Vec<VarId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an integer variable with domain `[lo, hi]`.
    pub fn new_int_var(&mut self, lo: i64, hi: i64, name: impl Into<String>) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lo,
            hi,
        });
        id
    }

    /// Adds a boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> VarId {
        self.new_int_var(0, 1, name)
    }

    /// Adds a variable fixed to `value`.
    pub fn new_constant(&mut self, value: i64, name: impl Into<String>) -> VarId {
        self.new_int_var(value, value, name)
    }

    pub fn add_le(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintRef<'_> {
        self.push(Constraint::new(expr.into(), Relation::Le, rhs))
    }

    pub fn add_ge(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintRef<'_> {
        self.push(Constraint::new(expr.into(), Relation::Ge, rhs))
    }

    pub fn add_eq(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintRef<'_> {
        self.push(Constraint::new(expr.into(), Relation::Eq, rhs))
    }

    fn push(&mut self, constraint: Constraint) -> ConstraintRef<'_> {
        self.constraints.push(constraint);
        let last = self.constraints.len() - 1;
        ConstraintRef {
            constraint: &mut self.constraints[last],
        }
    }

    pub fn maximize(&mut self, expr: impl Into<LinearExpr>) {
        self.set_objective(expr.into(), Sense::Maximize);
    }

    pub fn minimize(&mut self, expr: impl Into<LinearExpr>) {
        self.set_objective(expr.into(), Sense::Minimize);
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        let (terms, constant) = expr.into_normalized();
        self.objective = Some(Objective {
            terms,
            constant,
            sense,
        });
    }

    /// Appends variables to the preferred branching order.
    pub fn add_decision_order(&mut self, vars: impl IntoIterator<Item = VarId>) {
        self.decision_order.extend(vars);
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variable(&self, var: VarId) -> Option<&Variable> {
        self.variables.get(var.0)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn decision_order(&self) -> &[VarId] {
        &self.decision_order
    }

    /// Display label for constraint `index`.
    pub fn constraint_label(&self, index: usize) -> String {
        match self.constraints.get(index).and_then(|c| c.name()) {
            Some(name) => name.to_string(),
            None => format!("constraint #{}", index),
        }
    }

    /// Checks that every variable has a non-empty domain and every
    /// constraint refers to known variables with boolean literals.
    pub fn validate(&self) -> Result<(), ModelError> {
        for var in &self.variables {
            if var.lo > var.hi {
                return Err(ModelError::EmptyDomain {
                    name: var.name.clone(),
                    lo: var.lo,
                    hi: var.hi,
                });
            }
        }
        let n = self.variables.len();
        for (i, c) in self.constraints.iter().enumerate() {
            for &(v, _) in &c.terms {
                if v.0 >= n {
                    return Err(ModelError::UnknownVariable {
                        constraint: self.constraint_label(i),
                        var: v.0,
                    });
                }
            }
            for lit in &c.enforcement {
                match self.variables.get(lit.var.0) {
                    None => {
                        return Err(ModelError::UnknownVariable {
                            constraint: self.constraint_label(i),
                            var: lit.var.0,
                        })
                    }
                    Some(var) if !var.is_boolean() => {
                        return Err(ModelError::NonBooleanLiteral {
                            constraint: self.constraint_label(i),
                            name: var.name.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        let objective_terms = self.objective.iter().flat_map(|o| o.terms.iter());
        for &(v, _) in objective_terms {
            if v.0 >= n {
                return Err(ModelError::UnknownVariable {
                    constraint: "objective".to_string(),
                    var: v.0,
                });
            }
        }
        for &v in &self.decision_order {
            if v.0 >= n {
                return Err(ModelError::UnknownVariable {
                    constraint: "decision order".to_string(),
                    var: v.0,
                });
            }
        }
        Ok(())
    }

    /// Checks `assignment` against every domain and constraint.
    pub fn check(&self, assignment: &Assignment) -> Result<(), Violation> {
        if assignment.len() != self.variables.len() {
            return Err(Violation::Length {
                expected: self.variables.len(),
                actual: assignment.len(),
            });
        }
        for (var, &value) in self.variables.iter().zip(assignment.values()) {
            if !var.contains(value) {
                return Err(Violation::OutOfDomain {
                    name: var.name.clone(),
                    value,
                    lo: var.lo,
                    hi: var.hi,
                });
            }
        }
        match self
            .constraints
            .iter()
            .position(|c| !c.is_satisfied(assignment))
        {
            Some(index) => Err(Violation::Constraint {
                constraint: self.constraint_label(index),
            }),
            None => Ok(()),
        }
    }

    /// Objective value of `assignment`, if the model has an objective.
    pub fn objective_value(&self, assignment: &Assignment) -> Option<i64> {
        self.objective.as_ref().map(|o| o.value(assignment))
    }
}
