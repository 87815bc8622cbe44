//! Leaderboard queries and drift recovery

use streak_core::traits::{LeaderboardEntry, RankedEntry};
use streak_core::value_objects::UserId;
use streak_core::DomainError;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::projector::{LeaderboardProjector, ReplayOutcome};

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Highest-XP members, best first.
    ///
    /// `None` selects the configured default; larger requests are capped at the
    /// configured maximum.
    #[instrument(skip(self))]
    pub async fn top(&self, limit: Option<usize>) -> ServiceResult<Vec<LeaderboardEntry>> {
        let config = self.ctx.leaderboard_config();
        let limit = match limit {
            Some(0) => return Err(ServiceError::validation("limit must be at least 1")),
            Some(n) => n.min(config.max_limit),
            None => config.default_limit,
        };

        let index = self.ctx.index();
        self.ctx
            .policy()
            .with_retry("index_top", move || index.top(limit))
            .await
    }

    /// 1-based position of `user_id`
    #[instrument(skip(self))]
    pub async fn rank(&self, user_id: UserId) -> ServiceResult<RankedEntry> {
        let index = self.ctx.index();
        self.ctx
            .policy()
            .with_retry("index_rank", move || index.rank(user_id))
            .await
    }

    /// Resolve `username` through the record store, then rank by id
    #[instrument(skip(self))]
    pub async fn rank_by_username(&self, username: &str) -> ServiceResult<RankedEntry> {
        let records = self.ctx.records();
        let user = self
            .ctx
            .policy()
            .with_retry("get_by_username", move || records.get_by_username(username))
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        self.rank(user.id).await
    }

    /// Clear the index and reload it from the record store.
    ///
    /// Returns the number of members written.
    #[instrument(skip(self))]
    pub async fn rebuild(&self) -> ServiceResult<usize> {
        let policy = self.ctx.policy();
        let records = self.ctx.records();
        let index = self.ctx.index();

        let users = policy
            .with_retry("list_all", move || records.list_all())
            .await?;
        LeaderboardProjector::new(self.ctx).clear_index().await?;

        let users_ref = users.as_slice();
        let rebuilt = policy
            .with_retry("index_rebuild", move || index.rebuild_from(users_ref))
            .await?;

        info!(rebuilt, "Leaderboard rebuilt from record store");
        Ok(rebuilt)
    }

    /// Clear the index and reload it from the event stream
    pub async fn replay(&self) -> ServiceResult<ReplayOutcome> {
        LeaderboardProjector::new(self.ctx).replay().await
    }
}
