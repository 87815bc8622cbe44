//! # streak-cache
//!
//! Redis layer for the derived leaderboard state.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Leaderboard Index**: Sorted set keyed by user id, scored by XP
//! - **Event Stream**: Append-only stream of leaderboard events (`XADD` / `XRANGE`)
//!
//! ## Example
//!
//! ```ignore
//! use streak_cache::{RedisEventLog, RedisLeaderboard, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let index = RedisLeaderboard::new(pool.clone(), "leaderboard:global");
//! let stream = RedisEventLog::new(pool, "leaderboard_events");
//! ```

pub mod events;
pub mod leaderboard;
pub mod pool;

pub use events::RedisEventLog;
pub use leaderboard::RedisLeaderboard;
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
