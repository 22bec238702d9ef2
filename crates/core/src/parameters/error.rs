//! Parameter error types

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name longer than the store key length
    NameTooLong,
    /// No parameter registered under this name
    Unknown,
    /// Value type differs from the registered type
    TypeMismatch,
    /// Store is at capacity
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::NameTooLong => write!(f, "parameter name too long"),
            ParameterError::Unknown => write!(f, "unknown parameter"),
            ParameterError::TypeMismatch => write!(f, "parameter type mismatch"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
        }
    }
}
