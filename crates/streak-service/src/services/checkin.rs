//! Check-in orchestrator
//!
//! read → advance → save → emit, serialized per username. The save is the
//! commit point; emission afterwards is advisory and never fails the call.

use streak_core::entities::UserRecord;
use streak_core::events::LeaderboardEvent;
use streak_core::{advance, DomainError};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::projector::LeaderboardProjector;

/// Check-in service
pub struct CheckinService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CheckinService<'a> {
    /// Create a new CheckinService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record today's check-in for `username` and return the committed record.
    ///
    /// Rejections (`UserNotFound`, `AlreadyCheckedIn`, `InvalidDate`) happen before any
    /// write. The lock is held through emission so one user's events stay in order.
    #[instrument(skip(self))]
    pub async fn checkin(&self, username: &str) -> ServiceResult<UserRecord> {
        let _guard = self.ctx.locks().acquire(username).await;
        let policy = self.ctx.policy();
        let records = self.ctx.records();

        let prior = policy
            .with_retry("get_by_username", move || records.get_by_username(username))
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        let today = self.ctx.clock().today();
        let next = advance(&prior, today)?;

        let next_ref = &next;
        let saved = policy
            .with_retry("save", move || records.save(next_ref))
            .await?;

        info!(
            user_id = %saved.id,
            xp = saved.xp,
            streak = saved.streak,
            frozen_days = saved.frozen_days,
            "Check-in recorded"
        );

        let event = LeaderboardEvent::checkin(&saved, self.ctx.clock().now());
        LeaderboardProjector::new(self.ctx).project(&event).await;

        Ok(saved)
    }
}
