//! Leaderboard index port
//!
//! The index is a derived cache of `UserRecord::xp` keyed by [`UserId`]. It may lag
//! behind the record store or be empty after a flush, and it can always be rebuilt
//! from a full record snapshot.
//!
//! Ordering is by score descending. Members with equal scores are ordered by member
//! key descending, compared as strings the way Redis compares sorted-set members
//! for `ZREVRANGE` (`"9"` before `"10"`), and every member holds a
//! distinct rank.

use async_trait::async_trait;
use serde::Serialize;

use crate::entities::UserRecord;
use crate::traits::RepoResult;
use crate::value_objects::UserId;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub member: UserId,
    pub score: i64,
}

/// A member's 1-based position together with its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub member: UserId,
    pub rank: u64,
    pub score: i64,
}

#[async_trait]
pub trait LeaderboardIndex: Send + Sync {
    /// Insert or replace a member's score
    async fn upsert(&self, member: UserId, score: i64) -> RepoResult<()>;

    /// Highest scores first; fails with `EmptyLeaderboard` when the index has no entries
    async fn top(&self, limit: usize) -> RepoResult<Vec<LeaderboardEntry>>;

    /// 1-based rank of a member; fails with `MemberNotFound` when absent
    async fn rank(&self, member: UserId) -> RepoResult<RankedEntry>;

    /// Remove a member, returning whether it was present
    async fn remove(&self, member: UserId) -> RepoResult<bool>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> RepoResult<usize>;

    /// Number of entries
    async fn len(&self) -> RepoResult<usize>;

    /// Re-insert `(id, xp)` for every record of a snapshot
    async fn rebuild_from(&self, records: &[UserRecord]) -> RepoResult<usize> {
        for record in records {
            self.upsert(record.id, record.xp).await?;
        }
        Ok(records.len())
    }
}
