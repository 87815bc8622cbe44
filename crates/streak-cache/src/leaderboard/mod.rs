//! Leaderboard index on a Redis sorted set

mod sorted_set;

pub use sorted_set::RedisLeaderboard;
