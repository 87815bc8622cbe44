//! Redis sorted-set implementation of [`LeaderboardIndex`].
//!
//! Members are decimal user ids, scores are XP. `ZREVRANGE` / `ZREVRANK` give the
//! descending order with ties broken by member string, lexicographically highest first.

use async_trait::async_trait;
use tracing::{debug, instrument};

use streak_core::entities::UserRecord;
use streak_core::error::DomainError;
use streak_core::traits::{LeaderboardEntry, LeaderboardIndex, RankedEntry, RepoResult};
use streak_core::value_objects::UserId;

use crate::pool::{RedisPool, RedisPoolError};

/// Members written per pipeline during a rebuild
const REBUILD_BATCH: usize = 500;

/// Leaderboard index stored in one Redis sorted set
#[derive(Debug, Clone)]
pub struct RedisLeaderboard {
    pool: RedisPool,
    key: String,
}

impl RedisLeaderboard {
    pub fn new(pool: RedisPool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// Name of the sorted set backing this index
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn parse_member(raw: &str) -> RepoResult<UserId> {
    UserId::parse(raw).map_err(|e| {
        DomainError::CacheError(format!("unexpected leaderboard member {raw:?}: {e}"))
    })
}

fn cache_err(err: redis::RedisError) -> DomainError {
    RedisPoolError::from(err).into()
}

#[async_trait]
impl LeaderboardIndex for RedisLeaderboard {
    #[instrument(skip(self))]
    async fn upsert(&self, member: UserId, score: i64) -> RepoResult<()> {
        let mut conn = self.pool.get().await?;
        redis::cmd("ZADD")
            .arg(&self.key)
            .arg(score)
            .arg(member.member_key())
            .query_async::<()>(&mut conn)
            .await
            .map_err(cache_err)
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: usize) -> RepoResult<Vec<LeaderboardEntry>> {
        let mut conn = self.pool.get().await?;

        if limit == 0 {
            // ZREVRANGE 0 -1 would return everything
            let total: usize = redis::cmd("ZCARD")
                .arg(&self.key)
                .query_async(&mut conn)
                .await
                .map_err(cache_err)?;
            return if total == 0 {
                Err(DomainError::EmptyLeaderboard)
            } else {
                Ok(Vec::new())
            };
        }

        let rows: Vec<(String, i64)> = redis::cmd("ZREVRANGE")
            .arg(&self.key)
            .arg(0)
            .arg(limit - 1)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;

        if rows.is_empty() {
            return Err(DomainError::EmptyLeaderboard);
        }

        rows.into_iter()
            .map(|(member, score)| {
                Ok(LeaderboardEntry {
                    member: parse_member(&member)?,
                    score,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn rank(&self, member: UserId) -> RepoResult<RankedEntry> {
        let mut conn = self.pool.get().await?;
        let key = member.member_key();

        let (position, score): (Option<u64>, Option<i64>) = redis::pipe()
            .cmd("ZREVRANK")
            .arg(&self.key)
            .arg(&key)
            .cmd("ZSCORE")
            .arg(&self.key)
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;

        match (position, score) {
            (Some(position), Some(score)) => Ok(RankedEntry {
                member,
                rank: position + 1,
                score,
            }),
            _ => Err(DomainError::MemberNotFound(member)),
        }
    }

    #[instrument(skip(self))]
    async fn remove(&self, member: UserId) -> RepoResult<bool> {
        let mut conn = self.pool.get().await?;
        let removed: i64 = redis::cmd("ZREM")
            .arg(&self.key)
            .arg(member.member_key())
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        Ok(removed > 0)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> RepoResult<usize> {
        let mut conn = self.pool.get().await?;
        let (removed,): (usize,) = redis::pipe()
            .atomic()
            .cmd("ZCARD")
            .arg(&self.key)
            .cmd("DEL")
            .arg(&self.key)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;

        debug!(key = %self.key, removed, "Leaderboard key deleted");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn len(&self) -> RepoResult<usize> {
        let mut conn = self.pool.get().await?;
        redis::cmd("ZCARD")
            .arg(&self.key)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn rebuild_from(&self, records: &[UserRecord]) -> RepoResult<usize> {
        let mut conn = self.pool.get().await?;
        for chunk in records.chunks(REBUILD_BATCH) {
            let mut pipe = redis::pipe();
            for record in chunk {
                pipe.cmd("ZADD")
                    .arg(&self.key)
                    .arg(record.xp)
                    .arg(record.id.member_key())
                    .ignore();
            }
            pipe.query_async::<()>(&mut conn).await.map_err(cache_err)?;
        }
        Ok(records.len())
    }
}
