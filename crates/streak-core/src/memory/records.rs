//! In-process user record store

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::entities::{NewUserRecord, UserRecord};
use crate::error::DomainError;
use crate::traits::{RepoResult, UserRecordRepository};
use crate::value_objects::UserId;

#[derive(Debug, Default)]
struct Tables {
    by_id: BTreeMap<UserId, UserRecord>,
    by_username: HashMap<String, UserId>,
    last_id: i64,
}

/// [`UserRecordRepository`] held entirely in memory.
///
/// Ids are assigned sequentially from 1. Every operation takes the table lock once,
/// so `save` is atomic with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryUserRecordRepository {
    tables: RwLock<Tables>,
}

impl MemoryUserRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRecordRepository for MemoryUserRecordRepository {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        let tables = self.tables.read();
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        Ok(self.tables.read().by_id.get(&id).cloned())
    }

    async fn create(&self, seed: &NewUserRecord) -> RepoResult<UserRecord> {
        seed.validate()?;

        let mut tables = self.tables.write();
        if tables.by_username.contains_key(&seed.username) {
            return Err(DomainError::DuplicateUsername(seed.username.clone()));
        }

        tables.last_id += 1;
        let id = UserId::new(tables.last_id);
        let record = UserRecord::from_new(id, seed, Utc::now());
        tables.by_username.insert(record.username.clone(), id);
        tables.by_id.insert(id, record.clone());
        Ok(record)
    }

    async fn save(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        let mut tables = self.tables.write();
        let stored = tables
            .by_id
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;

        stored.xp = user.xp;
        stored.streak = user.streak;
        stored.max_streak = user.max_streak;
        stored.frozen_days = user.frozen_days;
        stored.last_checkin = user.last_checkin;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        let mut tables = self.tables.write();
        let removed = tables
            .by_id
            .remove(&user.id)
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;
        tables.by_username.remove(&removed.username);
        Ok(removed)
    }

    async fn list_all(&self) -> RepoResult<Vec<UserRecord>> {
        Ok(self.tables.read().by_id.values().cloned().collect())
    }
}
