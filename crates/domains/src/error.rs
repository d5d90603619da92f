//! # DomainError
//!
//! Centralized error taxonomy for the Inkpress core. Every expected failure
//! maps to one of these kinds; callers at the HTTP boundary translate each
//! kind to a distinct status code, so "your request was invalid" is always
//! distinguishable from "the system failed".

use thiserror::Error;

use crate::models::ReportStatus;

/// The primary error type for all core operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource or referenced target missing (e.g. Blog, Comment, Report)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Field constraint failure (length limits, enum membership)
    #[error("validation error: {0}")]
    Validation(String),

    /// No or invalid identity
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity, insufficient rights
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Well-formed request the domain rules reject (self-report, admin
    /// self-delete)
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Resource already exists (duplicate report, taken username/slug)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Report state machine violation
    #[error("invalid report status transition from {from} to {to}")]
    InvalidTransition { from: ReportStatus, to: ReportStatus },

    /// Infrastructure failure (DB down, pool exhausted). Logged at the
    /// boundary; the message is never leaked to clients.
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        DomainError::NotFound(entity.to_string(), id.to_string())
    }

    /// Stable machine-checkable tag used in structured responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound(..) => "not_found",
            DomainError::Validation(_) => "validation",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::InvalidOperation(_) => "invalid_operation",
            DomainError::Conflict(_) => "conflict",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::Internal(_) => "internal",
        }
    }
}

/// A specialized Result type for Inkpress core logic.
pub type Result<T> = std::result::Result<T, DomainError>;
