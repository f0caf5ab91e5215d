//! RotaForge Core - domain types for ability rotation planning
//!
//! This crate provides the building blocks the constraint encoder works from:
//! - Ability definitions and the validated ability catalog
//! - Combat styles
//! - Timeline discretization (seconds to ticks)
//! - The resource meter rules, one per ability category
//! - The error taxonomy shared by all RotaForge crates

pub mod ability;
pub mod catalog;
pub mod error;
pub mod resource;
pub mod style;
pub mod timeline;

pub use ability::{Ability, Category, UnknownCategory};
pub use catalog::{AbilityCatalog, AbilityRecord};
pub use error::{Result, RotaforgeError};
pub use resource::{
    BasicRule, BuffWindow, ResourceModel, ResourceRule, ThresholdRule, Transition,
    TransitionError, UltimateRequirement, UltimateRule, MAX_BUFF_MULTIPLIER, METER_MAX, METER_MIN,
};
pub use style::CombatStyle;
pub use timeline::{Timeline, DEFAULT_TICK_LENGTH};
