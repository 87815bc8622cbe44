//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use std::fmt;
use streak_common::AppError;
use streak_core::DomainError;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or a non-retried infrastructure failure
    Domain(DomainError),

    /// Validation error
    Validation(String),

    /// An authoritative call kept failing after every retry
    Unavailable {
        operation: &'static str,
        attempts: u32,
        last_error: DomainError,
    },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Unavailable {
                operation,
                attempts,
                last_error,
            } => write!(
                f,
                "Service unavailable: {operation} failed after {attempts} attempts ({last_error})"
            ),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) | Self::Unavailable { last_error: e, .. } => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The domain error behind this failure, if any
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::Unavailable { last_error: e, .. } => Some(e),
            Self::Validation(_) => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => AppError::domain_status(e),
            Self::Validation(_) => 400,
            Self::Unavailable { .. } => 503,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
