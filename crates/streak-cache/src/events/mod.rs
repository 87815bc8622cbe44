//! Leaderboard event stream on Redis streams

mod stream;

pub use stream::RedisEventLog;
