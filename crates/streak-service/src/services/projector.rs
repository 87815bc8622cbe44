//! Keeps the derived leaderboard state in step with the record store.
//!
//! After a commit the projector appends the event to the stream and mirrors the
//! score into the index. Both writes are advisory. It can also rebuild the index
//! from the stream, keeping only members the record store still holds.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use streak_core::events::LeaderboardEvent;
use streak_core::value_objects::UserId;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Stream entries fetched per read during replay
const REPLAY_BATCH: usize = 500;

/// What a replay applied to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    /// Stream entries read
    pub events: usize,
    /// Distinct members written to the index
    pub members: usize,
    /// Entries removed from the index before replaying
    pub cleared: usize,
}

/// Projects leaderboard events onto the stream and the index
pub struct LeaderboardProjector<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardProjector<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish `event` and mirror its score into the index.
    ///
    /// Never fails: the record store already holds the committed state.
    #[instrument(skip(self, event), fields(event = %event.kind(), user_id = %event.user_id()))]
    pub async fn project(&self, event: &LeaderboardEvent) {
        let policy = self.ctx.policy();

        if let Some(id) = policy
            .advisory("publish", self.ctx.publisher().publish(event))
            .await
        {
            debug!(stream_id = %id, "Leaderboard event published");
        }

        policy
            .advisory(
                "index_upsert",
                self.ctx.index().upsert(event.user_id(), event.xp()),
            )
            .await;
    }

    /// Drop a member from the index, best effort
    pub async fn forget(&self, member: UserId) {
        self.ctx
            .policy()
            .advisory("index_remove", self.ctx.index().remove(member))
            .await;
    }

    /// Clear the index, logging how many entries were removed
    pub async fn clear_index(&self) -> ServiceResult<usize> {
        let index = self.ctx.index();
        let removed = self
            .ctx
            .policy()
            .with_retry("index_clear", move || index.clear())
            .await?;
        info!(removed, "Leaderboard index cleared");
        Ok(removed)
    }

    /// Clear the index and rebuild it by folding the whole stream in order.
    ///
    /// The last event per member wins. The stream carries no deletions, so members
    /// missing from the record store are dropped.
    #[instrument(skip(self))]
    pub async fn replay(&self) -> ServiceResult<ReplayOutcome> {
        let policy = self.ctx.policy();
        let log = self.ctx.event_log();
        let records = self.ctx.records();
        let index = self.ctx.index();

        let mut latest: HashMap<UserId, i64> = HashMap::new();
        let mut cursor: Option<String> = None;
        let mut events = 0;
        loop {
            let after = cursor.as_deref();
            let batch = policy
                .with_retry("stream_read", move || log.read_after(after, REPLAY_BATCH))
                .await?;
            let Some(last) = batch.last() else {
                break;
            };
            cursor = Some(last.id.clone());
            events += batch.len();
            for stored in &batch {
                latest.insert(stored.event.user_id(), stored.event.xp());
            }
        }

        let live: HashSet<UserId> = policy
            .with_retry("list_all", move || records.list_all())
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();
        let folded = latest.len();
        latest.retain(|member, _| live.contains(member));
        if latest.len() < folded {
            debug!(dropped = folded - latest.len(), "Skipping deleted members");
        }

        let cleared = self.clear_index().await?;
        for (&member, &score) in &latest {
            policy
                .with_retry("index_upsert", move || index.upsert(member, score))
                .await?;
        }

        let outcome = ReplayOutcome {
            events,
            members: latest.len(),
            cleared,
        };
        info!(events = outcome.events, members = outcome.members, "Leaderboard replayed from stream");
        Ok(outcome)
    }
}
