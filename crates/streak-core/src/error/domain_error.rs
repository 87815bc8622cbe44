//! Domain errors - error types for the domain layer

use chrono::NaiveDate;
use thiserror::Error;

use crate::value_objects::UserId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User not found in leaderboard: {0}")]
    MemberNotFound(UserId),

    #[error("Leaderboard is empty")]
    EmptyLeaderboard,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Check-in date {today} precedes last check-in {last_checkin}")]
    InvalidDate {
        last_checkin: NaiveDate,
        today: NaiveDate,
    },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Already checked in on {date}")]
    AlreadyCheckedIn { date: NaiveDate },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Timed out: {0}")]
    Timeout(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::EmptyLeaderboard => "EMPTY_LEADERBOARD",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidDate { .. } => "INVALID_DATE",

            // Conflict
            Self::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            Self::AlreadyCheckedIn { .. } => "ALREADY_CHECKED_IN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error (missing user, missing member, or no data yet)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::MemberNotFound(_) | Self::EmptyLeaderboard
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidDate { .. })
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername(_) | Self::AlreadyCheckedIn { .. }
        )
    }

    /// Check if this is an infrastructure failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::Timeout(_)
        )
    }

    /// Business-rule rejections stop an operation before any mutation
    pub fn is_business_rule(&self) -> bool {
        self.is_not_found() || self.is_validation() || self.is_conflict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound("alice".to_string());
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::AlreadyCheckedIn { date: day(1) };
        assert_eq!(err.code(), "ALREADY_CHECKED_IN");

        assert_eq!(DomainError::EmptyLeaderboard.code(), "EMPTY_LEADERBOARD");
    }

    #[test]
    fn test_empty_leaderboard_is_distinct_from_missing_member() {
        let empty = DomainError::EmptyLeaderboard;
        let missing = DomainError::MemberNotFound(UserId::new(3));
        assert!(empty.is_not_found());
        assert!(missing.is_not_found());
        assert_ne!(empty.code(), missing.code());
    }

    #[test]
    fn test_is_transient() {
        assert!(DomainError::DatabaseError("down".to_string()).is_transient());
        assert!(DomainError::Timeout("save").is_transient());
        assert!(!DomainError::DuplicateUsername("bob".to_string()).is_transient());
        assert!(!DomainError::AlreadyCheckedIn { date: day(2) }.is_transient());
    }

    #[test]
    fn test_business_rule_classification() {
        assert!(DomainError::UserNotFound("x".to_string()).is_business_rule());
        assert!(DomainError::InvalidDate {
            last_checkin: day(5),
            today: day(4)
        }
        .is_business_rule());
        assert!(!DomainError::CacheError("x".to_string()).is_business_rule());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::UserNotFound("alice".to_string());
        assert_eq!(err.to_string(), "User not found: alice");

        let err = DomainError::AlreadyCheckedIn { date: day(9) };
        assert_eq!(err.to_string(), "Already checked in on 2024-03-09");
    }
}
