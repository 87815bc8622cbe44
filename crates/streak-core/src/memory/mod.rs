//! In-process implementations of the domain ports.
//!
//! Used by the `memory` storage backend and by the test suites of the outer crates.

mod clock;
mod event_log;
mod leaderboard;
mod ranked_set;
mod records;

pub use clock::FixedClock;
pub use event_log::MemoryEventLog;
pub use leaderboard::MemoryLeaderboard;
pub use ranked_set::RankedSet;
pub use records::MemoryUserRecordRepository;
