//! Error types for COMPASS operations

use crate::Sid;
use thiserror::Error;

/// Validation errors raised at the record boundary and by entity checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Constraint violation on {constraint}: {reason}")]
    ConstraintViolation { constraint: String, reason: String },
}

/// Structural problems in the manager hierarchy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Manager cycle detected: {}", format_chain(.sids))]
    Cycle { sids: Vec<Sid> },
}

/// Failures of the employee directory collaborator (the REST API in
/// production, an in-memory map in tests).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Directory rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to decode directory response: {reason}")]
    Decode { reason: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ValidationError),
}

/// Master error type for all COMPASS errors.
#[derive(Debug, Clone, Error)]
pub enum CompassError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

/// Result type alias for COMPASS operations.
pub type CompassResult<T> = Result<T, CompassError>;

/// Render a manager chain as `A -> B -> A`, closing the loop on the first sid.
fn format_chain(sids: &[Sid]) -> String {
    let mut parts: Vec<&str> = sids.iter().map(Sid::as_str).collect();
    if let Some(first) = sids.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

// =============================================================================
// TESTS
// =============================================================================
