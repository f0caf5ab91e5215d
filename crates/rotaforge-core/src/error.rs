//! Error types for RotaForge

use thiserror::Error;

/// Main error type for RotaForge operations.
///
/// Every variant is fatal to the solve invocation that raised it. Running out
/// of search time is not an error: it is reported as a status on the result.
#[derive(Debug, Error)]
pub enum RotaforgeError {
    /// A catalog row is malformed (bad number, unknown category, duplicate name).
    #[error("Invalid ability at row {row}: {reason}")]
    Validation { row: usize, reason: String },

    /// A construction parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The catalog lacks something the encoder structurally requires.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The solver proved that no rotation satisfies the model.
    #[error("No feasible rotation: {diagnostics}")]
    InfeasibleModel { diagnostics: String },

    /// The solver stopped before it found any rotation.
    #[error("Solver stopped ({status}) before finding a rotation: {diagnostics}")]
    NoSolution { status: String, diagnostics: String },

    /// The decoded trace breaks a rotation invariant.
    #[error("Inconsistent solution at tick {tick} ({ability}): {reason}")]
    InconsistentSolution {
        tick: usize,
        ability: String,
        reason: String,
    },

    /// The recomputed damage disagrees with the solver's objective.
    #[error("Objective {objective} does not match recomputed damage {recomputed}")]
    Verification { objective: i64, recomputed: i64 },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for RotaForge operations
pub type Result<T> = std::result::Result<T, RotaforgeError>;
