use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Row of the `user_records` table
#[derive(Debug, Clone, FromRow)]
pub struct UserRecordModel {
    pub id: i64,
    pub username: String,
    pub xp: i64,
    pub streak: i32,
    pub max_streak: i32,
    pub frozen_days: i32,
    pub last_checkin: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
