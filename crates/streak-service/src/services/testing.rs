//! Shared fixtures and failure-injecting doubles for the service tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use streak_common::CheckinPolicyConfig;
use streak_core::entities::{NewUserRecord, UserRecord};
use streak_core::events::LeaderboardEvent;
use streak_core::memory::{FixedClock, MemoryEventLog, MemoryLeaderboard, MemoryUserRecordRepository};
use streak_core::traits::{EventPublisher, RepoResult, UserRecordRepository};
use streak_core::value_objects::UserId;
use streak_core::DomainError;

use super::context::{ServiceContext, ServiceContextBuilder};
use super::policy::IoPolicy;

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
}

pub fn fast_policy() -> IoPolicy {
    IoPolicy::from(&CheckinPolicyConfig {
        store_timeout: Duration::from_millis(100),
        advisory_timeout: Duration::from_millis(50),
        max_retries: 3,
        retry_base_delay: Duration::from_millis(1),
    })
}

/// In-memory wiring with handles on the derived backends
pub struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<FixedClock>,
    pub index: Arc<MemoryLeaderboard>,
    pub stream: Arc<MemoryEventLog>,
}

impl Harness {
    pub fn new() -> Self {
        Self::wire(Arc::new(MemoryUserRecordRepository::new()), None)
    }

    pub fn with_store(store: Arc<dyn UserRecordRepository>) -> Self {
        Self::wire(store, None)
    }

    pub fn with_publisher(publisher: Arc<dyn EventPublisher>) -> Self {
        Self::wire(Arc::new(MemoryUserRecordRepository::new()), Some(publisher))
    }

    fn wire(store: Arc<dyn UserRecordRepository>, publisher: Option<Arc<dyn EventPublisher>>) -> Self {
        let clock = Arc::new(FixedClock::new(day(1)));
        let index = Arc::new(MemoryLeaderboard::new());
        let stream = Arc::new(MemoryEventLog::new());
        let publisher = publisher.unwrap_or_else(|| stream.clone() as Arc<dyn EventPublisher>);
        let ctx = ServiceContextBuilder::new()
            .records(store)
            .index(index.clone())
            .publisher(publisher)
            .event_log(stream.clone())
            .clock(clock.clone())
            .policy(fast_policy())
            .build()
            .unwrap();
        Self {
            ctx,
            clock,
            index,
            stream,
        }
    }

    pub async fn add_user(&self, seed: NewUserRecord) -> UserRecord {
        self.ctx.records().create(&seed).await.unwrap()
    }
}

/// Publisher that always fails
#[derive(Default)]
pub struct BrokenPublisher {
    pub calls: AtomicU32,
}

#[async_trait]
impl EventPublisher for BrokenPublisher {
    async fn publish(&self, _event: &LeaderboardEvent) -> RepoResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::CacheError("stream unavailable".to_string()))
    }
}

/// Record store whose `save` fails transiently a fixed number of times
pub struct FlakyStore {
    inner: MemoryUserRecordRepository,
    failures_left: AtomicU32,
    pub save_calls: AtomicU32,
}

impl FlakyStore {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: MemoryUserRecordRepository::new(),
            failures_left: AtomicU32::new(failures),
            save_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl UserRecordRepository for FlakyStore {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        self.inner.get_by_username(username).await
    }

    async fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, seed: &NewUserRecord) -> RepoResult<UserRecord> {
        self.inner.create(seed).await
    }

    async fn save(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::DatabaseError("connection reset".to_string()));
        }
        self.inner.save(user).await
    }

    async fn delete(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        self.inner.delete(user).await
    }

    async fn list_all(&self) -> RepoResult<Vec<UserRecord>> {
        self.inner.list_all().await
    }
}

/// Record store whose `list_all` waits before taking its snapshot
pub struct SlowListStore {
    inner: MemoryUserRecordRepository,
    delay: Duration,
}

impl SlowListStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryUserRecordRepository::new(),
            delay,
        }
    }
}

#[async_trait]
impl UserRecordRepository for SlowListStore {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        self.inner.get_by_username(username).await
    }

    async fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, seed: &NewUserRecord) -> RepoResult<UserRecord> {
        self.inner.create(seed).await
    }

    async fn save(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        self.inner.save(user).await
    }

    async fn delete(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        self.inner.delete(user).await
    }

    async fn list_all(&self) -> RepoResult<Vec<UserRecord>> {
        let snapshot = self.inner.list_all().await;
        tokio::time::sleep(self.delay).await;
        snapshot
    }
}
