//! Leaderboard events
//!
//! Each variant carries exactly the fields its stream entry holds: a
//! `user_created` fact has no streak, `checkin` and `sync_user` always do.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::UserRecord;
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Event type discriminator as written to the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardEventKind {
    UserCreated,
    Checkin,
    SyncUser,
}

impl LeaderboardEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user_created",
            Self::Checkin => "checkin",
            Self::SyncUser => "sync_user",
        }
    }
}

impl fmt::Display for LeaderboardEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeaderboardEventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_created" => Ok(Self::UserCreated),
            "checkin" => Ok(Self::Checkin),
            "sync_user" => Ok(Self::SyncUser),
            other => Err(DomainError::InternalError(format!(
                "unknown leaderboard event type: {other}"
            ))),
        }
    }
}

/// A fact about one user's score at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LeaderboardEvent {
    UserCreated {
        user_id: UserId,
        xp: i64,
        timestamp: DateTime<Utc>,
    },
    Checkin {
        user_id: UserId,
        xp: i64,
        streak: i32,
        timestamp: DateTime<Utc>,
    },
    SyncUser {
        user_id: UserId,
        xp: i64,
        streak: i32,
        timestamp: DateTime<Utc>,
    },
}

impl LeaderboardEvent {
    pub fn user_created(user: &UserRecord, timestamp: DateTime<Utc>) -> Self {
        Self::UserCreated {
            user_id: user.id,
            xp: user.xp,
            timestamp,
        }
    }

    pub fn checkin(user: &UserRecord, timestamp: DateTime<Utc>) -> Self {
        Self::Checkin {
            user_id: user.id,
            xp: user.xp,
            streak: user.streak,
            timestamp,
        }
    }

    pub fn sync_user(user: &UserRecord, timestamp: DateTime<Utc>) -> Self {
        Self::SyncUser {
            user_id: user.id,
            xp: user.xp,
            streak: user.streak,
            timestamp,
        }
    }

    pub fn kind(&self) -> LeaderboardEventKind {
        match self {
            Self::UserCreated { .. } => LeaderboardEventKind::UserCreated,
            Self::Checkin { .. } => LeaderboardEventKind::Checkin,
            Self::SyncUser { .. } => LeaderboardEventKind::SyncUser,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Self::UserCreated { user_id, .. }
            | Self::Checkin { user_id, .. }
            | Self::SyncUser { user_id, .. } => *user_id,
        }
    }

    pub fn xp(&self) -> i64 {
        match self {
            Self::UserCreated { xp, .. } | Self::Checkin { xp, .. } | Self::SyncUser { xp, .. } => {
                *xp
            }
        }
    }

    pub fn streak(&self) -> Option<i32> {
        match self {
            Self::UserCreated { .. } => None,
            Self::Checkin { streak, .. } | Self::SyncUser { streak, .. } => Some(*streak),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserCreated { timestamp, .. }
            | Self::Checkin { timestamp, .. }
            | Self::SyncUser { timestamp, .. } => *timestamp,
        }
    }

    /// Flatten into stream entry fields
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("event", self.kind().as_str().to_string()),
            ("user_id", self.user_id().to_string()),
            ("xp", self.xp().to_string()),
            ("timestamp", self.timestamp().to_rfc3339()),
        ];
        if let Some(streak) = self.streak() {
            fields.push(("streak", streak.to_string()));
        }
        fields
    }

    /// Rebuild an event from stream entry fields
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, DomainError> {
        let kind: LeaderboardEventKind = required(fields, "event")?.parse()?;
        let user_id = UserId::parse(required(fields, "user_id")?)
            .map_err(|e| malformed("user_id", &e.to_string()))?;
        let xp = required(fields, "xp")?
            .parse::<i64>()
            .map_err(|e| malformed("xp", &e.to_string()))?;
        let timestamp = DateTime::parse_from_rfc3339(required(fields, "timestamp")?)
            .map_err(|e| malformed("timestamp", &e.to_string()))?
            .with_timezone(&Utc);

        let streak = || -> Result<i32, DomainError> {
            required(fields, "streak")?
                .parse::<i32>()
                .map_err(|e| malformed("streak", &e.to_string()))
        };

        Ok(match kind {
            LeaderboardEventKind::UserCreated => Self::UserCreated {
                user_id,
                xp,
                timestamp,
            },
            LeaderboardEventKind::Checkin => Self::Checkin {
                user_id,
                xp,
                streak: streak()?,
                timestamp,
            },
            LeaderboardEventKind::SyncUser => Self::SyncUser {
                user_id,
                xp,
                streak: streak()?,
                timestamp,
            },
        })
    }
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, DomainError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| malformed(name, "missing"))
}

fn malformed(field: &str, reason: &str) -> DomainError {
    DomainError::InternalError(format!("malformed event field {field}: {reason}"))
}
