//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Functions in this workspace return [`anyhow::Result`]; the variants below are
/// wrapped into it, so callers can inspect them with `downcast_ref::<PursuitError>()`.
#[derive(Error, Debug, PartialEq)]
pub enum PursuitError {
    /// The action index is outside the action space.
    #[error("Invalid action: {0}")]
    InvalidAction(usize),

    /// The operation is not allowed in the current episode state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A batch larger than the number of stored transitions was requested.
    #[error("Insufficient data: requested {requested}, available {available}")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,
        /// Number of stored items.
        available: usize,
    },

    /// Shapes of observations, actions or estimators do not agree.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
