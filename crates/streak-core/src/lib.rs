//! # streak-core
//!
//! Domain layer containing the user record, the streak engine, leaderboard events,
//! and the port traits the outer layers implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).
//!
//! The [`memory`] module provides in-process implementations of every port. They back
//! the `memory` storage mode and the test suites.

pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod memory;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use engine::{advance, CHECKIN_XP_REWARD};
pub use entities::{NewUserRecord, UserRecord};
pub use error::DomainError;
pub use events::{LeaderboardEvent, LeaderboardEventKind};
pub use traits::{
    Clock, EventLog, EventPublisher, LeaderboardEntry, LeaderboardIndex, RankedEntry, RepoResult,
    StoredEvent, SystemClock, UserRecordRepository,
};
pub use value_objects::{UserId, UserIdParseError};
