//! Error types for the wind-streaks crates.
//!
//! Missing or uncovered grid data is never an error: field queries return
//! `None` and the sentinel propagates through interpolation, distortion and
//! particle advection. Errors exist only at construction time (mismatched
//! component series, bad configuration) and at the tick boundary (a failing
//! drawing surface).

use thiserror::Error;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for wind visualization operations.
#[derive(Debug, Error)]
pub enum WindError {
    #[error("Wind component mismatch: {0}")]
    ComponentMismatch(String),

    #[error("Missing wind component: {0}")]
    MissingComponent(&'static str),

    #[error("Empty grid: {0}")]
    EmptyGrid(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Rendering failed: {0}")]
    RenderError(String),
}
