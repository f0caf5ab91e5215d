//! Node count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates after exploring a number of search nodes.
///
/// # Example
///
/// ```
/// use rotaforge_solver::termination::NodeCountTermination;
///
/// let term = NodeCountTermination::new(100_000);
/// ```
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.stats().nodes >= self.limit
    }
}
