//! Event stream ports

use async_trait::async_trait;

use crate::events::LeaderboardEvent;
use crate::traits::RepoResult;

/// An event as stored in the log, with its stream-assigned id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: String,
    pub event: LeaderboardEvent,
}

/// Appends events to the ordered leaderboard stream
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Append an event, returning the id the stream assigned to it
    async fn publish(&self, event: &LeaderboardEvent) -> RepoResult<String>;
}

/// Reads the leaderboard stream back in append order
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Up to `count` events strictly after `cursor` (from the start when `None`)
    async fn read_after(&self, cursor: Option<&str>, count: usize) -> RepoResult<Vec<StoredEvent>>;
}
