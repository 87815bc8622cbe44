//! PostgreSQL implementation of UserRecordRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use streak_core::entities::{NewUserRecord, UserRecord};
use streak_core::error::DomainError;
use streak_core::traits::{RepoResult, UserRecordRepository};
use streak_core::value_objects::UserId;

use crate::models::UserRecordModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of UserRecordRepository.
///
/// Every mutation is a single-statement write, so `save` is atomic per row.
#[derive(Clone)]
pub struct PgUserRecordRepository {
    pool: PgPool,
}

impl PgUserRecordRepository {
    /// Create a new PgUserRecordRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRecordRepository for PgUserRecordRepository {
    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        let result = sqlx::query_as::<_, UserRecordModel>(
            r"
            SELECT id, username, xp, streak, max_streak, frozen_days, last_checkin,
                   created_at, updated_at
            FROM user_records
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserRecord::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        let result = sqlx::query_as::<_, UserRecordModel>(
            r"
            SELECT id, username, xp, streak, max_streak, frozen_days, last_checkin,
                   created_at, updated_at
            FROM user_records
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserRecord::from))
    }

    #[instrument(skip(self), fields(username = %seed.username))]
    async fn create(&self, seed: &NewUserRecord) -> RepoResult<UserRecord> {
        seed.validate()?;

        let model = sqlx::query_as::<_, UserRecordModel>(
            r"
            INSERT INTO user_records (username, xp, streak, max_streak, frozen_days)
            VALUES ($1, $2, $3, $3, $4)
            RETURNING id, username, xp, streak, max_streak, frozen_days, last_checkin,
                      created_at, updated_at
            ",
        )
        .bind(&seed.username)
        .bind(seed.xp)
        .bind(seed.streak)
        .bind(seed.frozen_days)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::DuplicateUsername(seed.username.clone()))
        })?;

        Ok(model.into())
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn save(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        let model = sqlx::query_as::<_, UserRecordModel>(
            r"
            UPDATE user_records
            SET xp = $2, streak = $3, max_streak = $4, frozen_days = $5,
                last_checkin = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, xp, streak, max_streak, frozen_days, last_checkin,
                      created_at, updated_at
            ",
        )
        .bind(user.id.into_inner())
        .bind(user.xp)
        .bind(user.streak)
        .bind(user.max_streak)
        .bind(user.frozen_days)
        .bind(user.last_checkin)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model
            .map(UserRecord::from)
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn delete(&self, user: &UserRecord) -> RepoResult<UserRecord> {
        let model = sqlx::query_as::<_, UserRecordModel>(
            r"
            DELETE FROM user_records
            WHERE id = $1
            RETURNING id, username, xp, streak, max_streak, frozen_days, last_checkin,
                      created_at, updated_at
            ",
        )
        .bind(user.id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model
            .map(UserRecord::from)
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRecordModel>(
            r"
            SELECT id, username, xp, streak, max_streak, frozen_days, last_checkin,
                   created_at, updated_at
            FROM user_records
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }
}
