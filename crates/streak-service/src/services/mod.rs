//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and hold no state of their own.

pub mod checkin;
pub mod context;
pub mod error;
pub mod leaderboard;
pub mod locks;
pub mod policy;
pub mod projector;
pub mod user;

#[cfg(test)]
mod testing;

pub use checkin::CheckinService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::LeaderboardService;
pub use locks::{KeyGuard, KeyedLocks};
pub use policy::IoPolicy;
pub use projector::{LeaderboardProjector, ReplayOutcome};
pub use user::{UserService, MAX_SEED_COUNT};
