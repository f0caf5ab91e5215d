//! Termination conditions for the search.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Why the search was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// A time or node budget ran out.
    Budget,
    /// The caller requested the stop.
    External,
}

/// Trait for determining when to stop searching.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;

    /// What kind of stop this condition represents.
    fn stop_kind(&self) -> StopKind {
        StopKind::Budget
    }
}

#[cfg(test)]
mod tests;
