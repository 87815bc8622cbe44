//! Service context - dependency container for services
//!
//! Holds the port implementations, the I/O policy and the per-user lock table.

use std::sync::Arc;

use streak_common::LeaderboardConfig;
use streak_core::memory::{MemoryEventLog, MemoryLeaderboard, MemoryUserRecordRepository};
use streak_core::traits::{
    Clock, EventLog, EventPublisher, LeaderboardIndex, SystemClock, UserRecordRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::locks::KeyedLocks;
use super::policy::IoPolicy;

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same backends and lock table.
#[derive(Clone)]
pub struct ServiceContext {
    // Authoritative store
    records: Arc<dyn UserRecordRepository>,

    // Derived state
    index: Arc<dyn LeaderboardIndex>,
    publisher: Arc<dyn EventPublisher>,
    event_log: Arc<dyn EventLog>,

    clock: Arc<dyn Clock>,
    policy: IoPolicy,
    leaderboard: LeaderboardConfig,
    locks: Arc<KeyedLocks>,
}

impl ServiceContext {
    /// Context backed entirely by in-process implementations
    pub fn in_memory() -> Self {
        let stream = Arc::new(MemoryEventLog::new());
        Self {
            records: Arc::new(MemoryUserRecordRepository::new()),
            index: Arc::new(MemoryLeaderboard::new()),
            publisher: stream.clone(),
            event_log: stream,
            clock: Arc::new(SystemClock),
            policy: IoPolicy::default(),
            leaderboard: LeaderboardConfig::default(),
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Get the record store
    pub fn records(&self) -> &dyn UserRecordRepository {
        self.records.as_ref()
    }

    /// Get the leaderboard index
    pub fn index(&self) -> &dyn LeaderboardIndex {
        self.index.as_ref()
    }

    /// Get the event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    /// Get the event log reader
    pub fn event_log(&self) -> &dyn EventLog {
        self.event_log.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn policy(&self) -> &IoPolicy {
        &self.policy
    }

    pub fn leaderboard_config(&self) -> &LeaderboardConfig {
        &self.leaderboard
    }

    /// Per-username lock table
    pub fn locks(&self) -> &KeyedLocks {
        &self.locks
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("policy", &self.policy)
            .field("leaderboard", &self.leaderboard)
            .field("locked_keys", &self.locks.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    records: Option<Arc<dyn UserRecordRepository>>,
    index: Option<Arc<dyn LeaderboardIndex>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    event_log: Option<Arc<dyn EventLog>>,
    clock: Option<Arc<dyn Clock>>,
    policy: Option<IoPolicy>,
    leaderboard: Option<LeaderboardConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(mut self, repo: Arc<dyn UserRecordRepository>) -> Self {
        self.records = Some(repo);
        self
    }

    pub fn index(mut self, index: Arc<dyn LeaderboardIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn event_log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.event_log = Some(log);
        self
    }

    /// Defaults to the system clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn policy(mut self, policy: IoPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn leaderboard(mut self, config: LeaderboardConfig) -> Self {
        self.leaderboard = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            records: self
                .records
                .ok_or_else(|| ServiceError::validation("records is required"))?,
            index: self
                .index
                .ok_or_else(|| ServiceError::validation("index is required"))?,
            publisher: self
                .publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
            event_log: self
                .event_log
                .ok_or_else(|| ServiceError::validation("event_log is required"))?,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            policy: self.policy.unwrap_or_default(),
            leaderboard: self.leaderboard.unwrap_or_default(),
            locks: Arc::new(KeyedLocks::new()),
        })
    }
}
