//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use streak_core::value_objects::UserId;

// ============================================================================
// User Responses
// ============================================================================

/// Full user record
#[derive(Debug, Clone, Serialize)]
pub struct UserRecordResponse {
    pub id: UserId,
    pub username: String,
    pub xp: i64,
    pub streak: i32,
    pub max_streak: i32,
    pub frozen_days: i32,
    pub last_checkin: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a bulk index re-sync
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SyncResponse {
    pub synced: usize,
}

// ============================================================================
// Leaderboard Responses
// ============================================================================

/// One row of the top-N listing
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryResponse {
    pub rank: u64,
    pub user_id: UserId,
    pub xp: i64,
}

/// A single member's position
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub user_id: UserId,
    pub rank: u64,
    pub xp: i64,
}

/// Result of rebuilding the index from the record store
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RebuildResponse {
    pub rebuilt: usize,
}

/// Result of replaying the event stream
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReplayResponse {
    pub events: usize,
    pub members: usize,
}

// ============================================================================
// Health
// ============================================================================

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
