//! User record entity - the authoritative per-user engagement state

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DomainError;
use crate::value_objects::UserId;

/// Authoritative engagement state of one user.
///
/// Invariants: all counters are non-negative and `max_streak >= streak`.
/// `last_checkin` is `None` only before the first check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
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

impl UserRecord {
    /// Materialize a freshly registered record
    pub fn from_new(id: UserId, seed: &NewUserRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: seed.username.clone(),
            xp: seed.xp,
            streak: seed.streak,
            max_streak: seed.streak,
            frozen_days: seed.frozen_days,
            last_checkin: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user has ever checked in
    #[inline]
    pub fn has_checked_in(&self) -> bool {
        self.last_checkin.is_some()
    }

    /// Apply an explicit admin adjustment of the counters.
    ///
    /// `last_checkin` is never touched and `max_streak` keeps its high-water mark.
    pub fn apply_sync(
        &mut self,
        xp: Option<i64>,
        streak: Option<i32>,
        frozen_days: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        ensure_non_negative("xp", xp.unwrap_or_default())?;
        ensure_non_negative("streak", streak.map_or(0, i64::from))?;
        ensure_non_negative("frozen_days", frozen_days.map_or(0, i64::from))?;

        if let Some(xp) = xp {
            self.xp = xp;
        }
        if let Some(streak) = streak {
            self.streak = streak;
            self.max_streak = self.max_streak.max(streak);
        }
        if let Some(frozen_days) = frozen_days {
            self.frozen_days = frozen_days;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Registration seed. Bulk seeding may start the counters above zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub username: String,
    pub xp: i64,
    pub streak: i32,
    pub frozen_days: i32,
}

impl NewUserRecord {
    /// Seed with all counters at zero
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            xp: 0,
            streak: 0,
            frozen_days: 0,
        }
    }

    #[must_use]
    pub fn with_xp(mut self, xp: i64) -> Self {
        self.xp = xp;
        self
    }

    #[must_use]
    pub fn with_streak(mut self, streak: i32) -> Self {
        self.streak = streak;
        self
    }

    #[must_use]
    pub fn with_frozen_days(mut self, frozen_days: i32) -> Self {
        self.frozen_days = frozen_days;
        self
    }

    /// Check the seed before it reaches the record store
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "username must not be empty".to_string(),
            ));
        }
        ensure_non_negative("xp", self.xp)?;
        ensure_non_negative("streak", i64::from(self.streak))?;
        ensure_non_negative("frozen_days", i64::from(self.frozen_days))
    }
}

fn ensure_non_negative(field: &str, value: i64) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::ValidationError(format!(
            "{field} must be non-negative"
        )));
    }
    Ok(())
}
