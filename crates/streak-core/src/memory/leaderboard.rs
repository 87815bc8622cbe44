//! In-process leaderboard index

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::entities::UserRecord;
use crate::error::DomainError;
use crate::memory::RankedSet;
use crate::traits::{LeaderboardEntry, LeaderboardIndex, RankedEntry, RepoResult};
use crate::value_objects::UserId;

/// [`LeaderboardIndex`] backed by a [`RankedSet`] behind a read/write lock
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    set: RwLock<RankedSet>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardIndex for MemoryLeaderboard {
    async fn upsert(&self, member: UserId, score: i64) -> RepoResult<()> {
        self.set.write().insert(member, score);
        Ok(())
    }

    async fn top(&self, limit: usize) -> RepoResult<Vec<LeaderboardEntry>> {
        let set = self.set.read();
        if set.is_empty() {
            return Err(DomainError::EmptyLeaderboard);
        }
        Ok(set
            .range(0, limit)
            .into_iter()
            .map(|(member, score)| LeaderboardEntry { member, score })
            .collect())
    }

    async fn rank(&self, member: UserId) -> RepoResult<RankedEntry> {
        let set = self.set.read();
        match (set.rank(member), set.score(member)) {
            (Some(position), Some(score)) => Ok(RankedEntry {
                member,
                rank: position as u64 + 1,
                score,
            }),
            _ => Err(DomainError::MemberNotFound(member)),
        }
    }

    async fn remove(&self, member: UserId) -> RepoResult<bool> {
        Ok(self.set.write().remove(member).is_some())
    }

    async fn clear(&self) -> RepoResult<usize> {
        Ok(self.set.write().clear())
    }

    async fn len(&self) -> RepoResult<usize> {
        Ok(self.set.read().len())
    }

    async fn rebuild_from(&self, records: &[UserRecord]) -> RepoResult<usize> {
        let mut set = self.set.write();
        for record in records {
            set.insert(record.id, record.xp);
        }
        Ok(records.len())
    }
}
