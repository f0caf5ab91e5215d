//! RotaForge - damage-maximizing ability rotation planner
//!
//! Encodes an ability catalog, a fight horizon and the resource meter rules
//! into an integer model, hands it to a [`Solver`], then decodes and verifies
//! the answer.
//!
//! # Example
//!
//! ```rust
//! use rotaforge::prelude::*;
//!
//! let catalog = AbilityCatalog::new(vec![
//!     Ability::basic("Slice", 60, 3, 5),
//!     Ability::threshold("Smash", 120, 3, 10),
//! ])
//! .unwrap();
//!
//! let report = RotationPlanner::new()
//!     .plan(&catalog, &RotationRequest::new(6.0, 50))
//!     .unwrap();
//! assert!(report.total_damage > 0);
//! ```

mod batch;
mod decoder;
mod encoder;
mod report;
mod rotation;

pub use batch::{solve_batch, BatchJob};
pub use decoder::{DecodedRotation, SolutionDecoder};
pub use encoder::{ConstraintEncoder, EncodedRotation, Pin};
pub use report::{RotationEntry, RotationReport};
pub use rotation::{Horizon, PlannerSettings, RotationContext, RotationPlanner, RotationRequest};

pub use rotaforge_config::RotaforgeConfig;
pub use rotaforge_core::{
    Ability, AbilityCatalog, Category, CombatStyle, ResourceModel, Result, RotaforgeError,
    Timeline, UltimateRequirement,
};
pub use rotaforge_solver::{BranchAndBound, SolveStatus, Solver};

/// Colored console output, enabled with the `console` feature.
#[cfg(feature = "console")]
pub use rotaforge_console as console;

pub mod prelude {
    pub use super::{
        Ability, AbilityCatalog, Category, CombatStyle, RotationPlanner, RotationReport,
        RotationRequest, SolveStatus,
    };
}
