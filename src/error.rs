//! Error handling for the parameter model.
//!
//! This module defines the main error type [`ParameterError`] used throughout
//! the library, along with a convenient [`Result`] type alias. Structural
//! errors (a parameter without a name, an unresolvable location) are fatal and
//! surface immediately; value-compliance problems are recovered locally during
//! ingestion and reported through [`CoercionError`], which never crosses the
//! crate boundary.

use thiserror::Error;

use crate::parameter::types::ParameterType;

/// Result type for parameter model operations
pub type Result<T> = std::result::Result<T, ParameterError>;

/// Main error type for parameter model operations
#[derive(Debug, Error)]
pub enum ParameterError {
    /// The raw declaration cannot produce a parameter at all
    #[error("parameter creation failed: {0}")]
    Creation(String),

    /// A mutating call reached a parameter owned by a read-only operation
    #[error(
        "operation '{operation}' is read-only; deep clone the parameter into a mutable operation before editing"
    )]
    EditReadOnlyOperation { operation: String },

    /// Two declarations of the same logical parameter disagree on their type
    #[error("cannot merge parameter '{name}': declared types differ ({left} and {right})")]
    MergeTypeMismatch {
        name: String,
        left: String,
        right: String,
    },

    /// A runtime value assignment was rejected; assignments are never coerced
    #[error("value '{value}' is not compliant with declared type {expected}")]
    NonCompliantValue {
        value: String,
        expected: ParameterType,
    },
}

impl ParameterError {
    /// Create a new creation error
    pub fn creation<S: Into<String>>(msg: S) -> Self {
        Self::Creation(msg.into())
    }
}

/// Non-fatal conversion failure inside default/enum/example ingestion.
///
/// Values that fail both compliance and coercion are discarded with a warning;
/// this error never propagates out of the ingestion path.
#[derive(Debug, Error)]
#[error("cannot coerce value '{value}' to type {target}")]
pub struct CoercionError {
    pub value: String,
    pub target: ParameterType,
}
