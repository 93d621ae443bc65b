//! Parameter error type.

use core::fmt;

/// Errors from parameter registration and updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name too long or store full
    CapacityExceeded,
    /// Parameter was never registered
    NotFound,
    /// Value variant does not match the registered variant
    TypeMismatch,
    /// Parameter is flagged read-only
    ReadOnly,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::CapacityExceeded => write!(f, "Parameter store capacity exceeded"),
            ParameterError::NotFound => write!(f, "Parameter not found"),
            ParameterError::TypeMismatch => write!(f, "Parameter value type mismatch"),
            ParameterError::ReadOnly => write!(f, "Parameter is read-only"),
        }
    }
}
