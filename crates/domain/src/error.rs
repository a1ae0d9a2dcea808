//! Unified error types for the rules engine
//!
//! Every invariant-checked setter returns `Result<_, DomainError>`. A returned
//! error always means the write was refused and the model is unchanged.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for tag enums and value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Slot index outside the current collection bounds
    #[error("Slot {index} is out of range ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    /// Collection is at capacity
    #[error("Container full: {current}/{max} slots")]
    ContainerFull { current: u32, max: u32 },
}

impl DomainError {
    /// Creates a validation error for malformed input values.
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a slot out of range error
    pub fn slot_out_of_range(index: usize, len: usize) -> Self {
        Self::SlotOutOfRange { index, len }
    }

    /// Create a container full error
    pub fn container_full(current: u32, max: u32) -> Self {
        Self::ContainerFull { current, max }
    }
}
