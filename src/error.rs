//! Error types for panel computations

use thiserror::Error;

/// Main error type for panel element operations
#[derive(Error, Debug)]
pub enum PanelError {
    /// Degenerate, self-intersecting or clockwise quadrilateral, or a vanishing
    /// denominator in the stiffness formulation. Fatal for the element.
    #[error("Invalid panel geometry: {0}")]
    Geometry(String),

    /// NaN or infinite values produced by a material update or by the
    /// finite-difference tangent.
    #[error("Computation failed: {0}")]
    Computation(String),

    /// Caller broke the element contract (wrong vector length, missing dof,
    /// analysis not run).
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for panel operations
pub type PanelResult<T> = Result<T, PanelError>;
