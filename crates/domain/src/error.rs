//! Unified error types for the domain layer
//!
//! Structural misuse (bad names, wrong operand kinds, bad lookup keys) is an
//! error and propagates to the caller. Routine gameplay misses (quest not
//! found among active, already completed) are modeled as outcome enums on the
//! operations themselves, not as errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., entity name too short)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Combining a trait with a non-trait operand
    #[error("Combination failed: {0}")]
    Combination(String),

    /// Ordering a quest against a non-quest operand
    #[error("Comparison failed: {0}")]
    Comparison(String),

    /// Name-keyed lookup miss
    #[error("Not found: {kind} with name '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// Index-keyed lookup miss
    #[error("Index {0} out of range")]
    OutOfRange(i64),

    /// Lookup key of an unsupported kind
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Non-integer level adjustment
    #[error("Invalid level adjustment: {0}")]
    InvalidLevel(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a combination error
    pub fn combination(msg: impl Into<String>) -> Self {
        Self::Combination(msg.into())
    }

    /// Create a comparison error
    pub fn comparison(msg: impl Into<String>) -> Self {
        Self::Comparison(msg.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create an out of range error
    pub fn out_of_range(index: i64) -> Self {
        Self::OutOfRange(index)
    }

    /// Create a type mismatch error
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Create an invalid level error
    pub fn invalid_level(msg: impl Into<String>) -> Self {
        Self::InvalidLevel(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name too short");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name too short");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("trait or quest", "Лабиринт");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("trait or quest"));
        assert!(err.to_string().contains("Лабиринт"));
    }

    #[test]
    fn test_out_of_range_error() {
        let err = DomainError::out_of_range(5);
        assert_eq!(err.to_string(), "Index 5 out of range");
    }

    #[test]
    fn test_combination_error() {
        let err = DomainError::combination("only traits can be combined");
        assert!(matches!(err, DomainError::Combination(_)));
        assert_eq!(
            err.to_string(),
            "Combination failed: only traits can be combined"
        );
    }
}
