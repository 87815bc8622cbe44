//! User ID - surrogate key assigned by the record store
//!
//! The same identifier is the member key of the leaderboard index and the
//! `user_id` field of every leaderboard event. Usernames are only resolved at
//! the query boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate user identifier (positive 64-bit integer)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Render as the leaderboard member key
    #[inline]
    pub fn member_key(&self) -> String {
        self.0.to_string()
    }

    /// Parse from string representation (leaderboard member keys, path segments)
    pub fn parse(s: &str) -> Result<Self, UserIdParseError> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            Ok(_) => Err(UserIdParseError::NotPositive),
            Err(_) => Err(UserIdParseError::InvalidFormat),
        }
    }
}

/// Error when parsing a UserId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserIdParseError {
    #[error("invalid user id format")]
    InvalidFormat,

    #[error("user id must be positive")]
    NotPositive,
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::parse(s)
    }
}
