//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{NewUserRecord, UserRecord};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Record Repository
// ============================================================================

/// Authoritative store of user records, keyed by id with a unique username index
#[async_trait]
pub trait UserRecordRepository: Send + Sync {
    /// Find a record by username (case-sensitive)
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>>;

    /// Find a record by id
    async fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>>;

    /// Insert a new record; fails with `DuplicateUsername` if the username is taken
    async fn create(&self, seed: &NewUserRecord) -> RepoResult<UserRecord>;

    /// Atomically overwrite the mutable fields of an existing record
    async fn save(&self, user: &UserRecord) -> RepoResult<UserRecord>;

    /// Remove a record, returning what was deleted
    async fn delete(&self, user: &UserRecord) -> RepoResult<UserRecord>;

    /// Snapshot of every record, ordered by id
    async fn list_all(&self) -> RepoResult<Vec<UserRecord>>;
}
