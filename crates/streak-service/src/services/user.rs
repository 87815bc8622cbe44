//! User service
//!
//! Registration, bulk seeding, lookup, admin counter sync and deletion. Writes that
//! touch an existing record take the same per-username lock as the check-in path.

use rand::Rng;
use streak_core::entities::{NewUserRecord, UserRecord};
use streak_core::events::LeaderboardEvent;
use streak_core::value_objects::UserId;
use streak_core::DomainError;
use tracing::{debug, info, instrument};

use crate::dto::{RegisterUserRequest, UpdateUserRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::projector::LeaderboardProjector;

/// Upper bound for a single seed request
pub const MAX_SEED_COUNT: usize = 1000;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and announce it on the leaderboard
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: RegisterUserRequest) -> ServiceResult<UserRecord> {
        let seed = NewUserRecord::from(&req);
        let user = self.create(&seed).await?;
        info!(user_id = %user.id, username = %user.username, xp = user.xp, "User registered");
        Ok(user)
    }

    /// Create `user1..user{count}` with random starting XP.
    ///
    /// Usernames that are already taken are skipped.
    #[instrument(skip(self))]
    pub async fn seed(&self, count: usize) -> ServiceResult<Vec<UserRecord>> {
        if !(1..=MAX_SEED_COUNT).contains(&count) {
            return Err(ServiceError::validation(format!(
                "count must be between 1 and {MAX_SEED_COUNT}"
            )));
        }

        let mut created = Vec::with_capacity(count);
        for n in 1..=count {
            let xp = 10 * rand::thread_rng().gen_range(1..=100i64);
            let seed = NewUserRecord::new(format!("user{n}")).with_xp(xp);
            match self.create(&seed).await {
                Ok(user) => created.push(user),
                Err(ServiceError::Domain(DomainError::DuplicateUsername(name))) => {
                    debug!(username = %name, "Seed user already exists, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        info!(requested = count, created = created.len(), "Users seeded");
        Ok(created)
    }

    /// Get a user by id
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserRecord> {
        self.load(user_id).await
    }

    /// Overwrite the counters named in `req`. `last_checkin` is never touched.
    #[instrument(skip(self, req))]
    pub async fn update_user(
        &self,
        user_id: UserId,
        req: UpdateUserRequest,
    ) -> ServiceResult<UserRecord> {
        let username = self.load(user_id).await?.username;
        let _guard = self.ctx.locks().acquire(&username).await;

        // Re-read under the lock so a concurrent check-in is not overwritten
        let mut user = self.load(user_id).await?;
        user.apply_sync(req.xp, req.streak, req.frozen_days, self.ctx.clock().now())?;

        let records = self.ctx.records();
        let user_ref = &user;
        let saved = self
            .ctx
            .policy()
            .with_retry("save", move || records.save(user_ref))
            .await?;

        info!(user_id = %saved.id, xp = saved.xp, streak = saved.streak, "User counters synced");

        let event = LeaderboardEvent::sync_user(&saved, self.ctx.clock().now());
        LeaderboardProjector::new(self.ctx).project(&event).await;
        Ok(saved)
    }

    /// Delete a user and return the removed record
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: UserId) -> ServiceResult<UserRecord> {
        let username = self.load(user_id).await?.username;
        let _guard = self.ctx.locks().acquire(&username).await;

        let user = self.load(user_id).await?;
        let removed = self
            .ctx
            .policy()
            .without_retry("delete", self.ctx.records().delete(&user))
            .await?;

        info!(user_id = %removed.id, username = %removed.username, "User deleted");
        LeaderboardProjector::new(self.ctx).forget(removed.id).await;
        Ok(removed)
    }

    /// Re-emit every record's current XP and refresh its index entry.
    ///
    /// Each record is re-read under its username lock so a check-in that commits
    /// after the listing is never rolled back in the index. Returns the number of
    /// records synced.
    #[instrument(skip(self))]
    pub async fn sync_all(&self) -> ServiceResult<usize> {
        let records = self.ctx.records();
        let users = self
            .ctx
            .policy()
            .with_retry("list_all", move || records.list_all())
            .await?;

        let projector = LeaderboardProjector::new(self.ctx);
        let mut synced = 0;
        for listed in &users {
            let _guard = self.ctx.locks().acquire(&listed.username).await;
            let user = match self.load(listed.id).await {
                Ok(user) => user,
                Err(ServiceError::Domain(DomainError::UserNotFound(_))) => {
                    debug!(user_id = %listed.id, "User deleted during sync, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let event = LeaderboardEvent::sync_user(&user, self.ctx.clock().now());
            projector.project(&event).await;
            synced += 1;
        }

        info!(listed = users.len(), synced, "All users synced to leaderboard");
        Ok(synced)
    }

    async fn create(&self, seed: &NewUserRecord) -> ServiceResult<UserRecord> {
        // Not idempotent: a retried insert could report a false duplicate
        let user = self
            .ctx
            .policy()
            .without_retry("create", self.ctx.records().create(seed))
            .await?;

        let event = LeaderboardEvent::user_created(&user, self.ctx.clock().now());
        LeaderboardProjector::new(self.ctx).project(&event).await;
        Ok(user)
    }

    async fn load(&self, user_id: UserId) -> ServiceResult<UserRecord> {
        let records = self.ctx.records();
        self.ctx
            .policy()
            .with_retry("get_by_id", move || records.get_by_id(user_id))
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()).into())
    }
}
