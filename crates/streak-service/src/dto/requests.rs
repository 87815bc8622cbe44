//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use streak_core::entities::NewUserRecord;
use validator::Validate;

// ============================================================================
// User Requests
// ============================================================================

/// Registration request. Omitted counters start at zero.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(range(min = 0, message = "xp must be non-negative"))]
    pub xp: Option<i64>,

    #[validate(range(min = 0, message = "streak must be non-negative"))]
    pub streak: Option<i32>,

    #[validate(range(min = 0, message = "frozen_days must be non-negative"))]
    pub frozen_days: Option<i32>,
}

impl RegisterUserRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            xp: None,
            streak: None,
            frozen_days: None,
        }
    }
}

impl From<&RegisterUserRequest> for NewUserRecord {
    fn from(req: &RegisterUserRequest) -> Self {
        NewUserRecord::new(req.username.trim())
            .with_xp(req.xp.unwrap_or_default())
            .with_streak(req.streak.unwrap_or_default())
            .with_frozen_days(req.frozen_days.unwrap_or_default())
    }
}

/// Admin counter adjustment. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(range(min = 0, message = "xp must be non-negative"))]
    pub xp: Option<i64>,

    #[validate(range(min = 0, message = "streak must be non-negative"))]
    pub streak: Option<i32>,

    #[validate(range(min = 0, message = "frozen_days must be non-negative"))]
    pub frozen_days: Option<i32>,
}

impl UpdateUserRequest {
    /// Whether the request changes nothing
    pub fn is_empty(&self) -> bool {
        self.xp.is_none() && self.streak.is_none() && self.frozen_days.is_none()
    }
}

// ============================================================================
// Leaderboard Requests
// ============================================================================

/// Query string of `GET /leaderboard`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}
