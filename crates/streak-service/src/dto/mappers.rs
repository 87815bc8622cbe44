//! Entity to DTO mappers

use streak_core::entities::UserRecord;
use streak_core::traits::{LeaderboardEntry, RankedEntry};

use super::responses::{LeaderboardEntryResponse, RankResponse, ReplayResponse, UserRecordResponse};
use crate::services::ReplayOutcome;

impl From<&UserRecord> for UserRecordResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            xp: user.xp,
            streak: user.streak,
            max_streak: user.max_streak,
            frozen_days: user.frozen_days,
            last_checkin: user.last_checkin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserRecord> for UserRecordResponse {
    fn from(user: UserRecord) -> Self {
        Self::from(&user)
    }
}

impl From<RankedEntry> for RankResponse {
    fn from(entry: RankedEntry) -> Self {
        Self {
            user_id: entry.member,
            rank: entry.rank,
            xp: entry.score,
        }
    }
}

impl From<ReplayOutcome> for ReplayResponse {
    fn from(outcome: ReplayOutcome) -> Self {
        Self {
            events: outcome.events,
            members: outcome.members,
        }
    }
}

/// Number a top-N listing with its 1-based ranks
pub fn ranked_entries(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntryResponse> {
    entries
        .into_iter()
        .zip(1u64..)
        .map(|(entry, rank)| LeaderboardEntryResponse {
            rank,
            user_id: entry.member,
            xp: entry.score,
        })
        .collect()
}
