//! Composite termination.

use super::{StopKind, Termination};
use crate::scope::SearchScope;

/// Stops as soon as any of its conditions holds.
#[derive(Debug, Default)]
pub struct OrTermination {
    conditions: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: impl Termination + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Returns the kind of the first condition that holds.
    pub fn check(&self, scope: &SearchScope) -> Option<StopKind> {
        self.conditions
            .iter()
            .find(|c| c.is_terminated(scope))
            .map(|c| c.stop_kind())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Termination for OrTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.check(scope).is_some()
    }

    fn stop_kind(&self) -> StopKind {
        if self
            .conditions
            .iter()
            .any(|c| c.stop_kind() == StopKind::External)
        {
            StopKind::External
        } else {
            StopKind::Budget
        }
    }
}
