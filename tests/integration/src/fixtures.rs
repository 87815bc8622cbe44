//! Test fixtures and data generators

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Day `n` of the test month
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).unwrap_or_default()
}

/// Registration request body
#[derive(Debug, Default, Serialize)]
pub struct RegisterUser {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_days: Option<i32>,
}

impl RegisterUser {
    pub fn named(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    pub fn unique() -> Self {
        Self::named(&format!("player{}", unique_suffix()))
    }

    pub fn with_xp(mut self, xp: i64) -> Self {
        self.xp = Some(xp);
        self
    }

    pub fn with_frozen_days(mut self, frozen_days: i32) -> Self {
        self.frozen_days = Some(frozen_days);
        self
    }
}

/// Admin sync request body
#[derive(Debug, Default, Serialize)]
pub struct SyncUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_days: Option<i32>,
}

/// User record as returned by the API
#[derive(Debug, Deserialize)]
pub struct UserRecordBody {
    pub id: i64,
    pub username: String,
    pub xp: i64,
    pub streak: i32,
    pub max_streak: i32,
    pub frozen_days: i32,
    pub last_checkin: Option<NaiveDate>,
}

/// One leaderboard row
#[derive(Debug, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u64,
    pub user_id: i64,
    pub xp: i64,
}

/// Rank lookup body
#[derive(Debug, Deserialize)]
pub struct RankBody {
    pub user_id: i64,
    pub rank: u64,
    pub xp: i64,
}
