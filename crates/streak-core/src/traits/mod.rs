//! Port traits implemented by the infrastructure crates

mod clock;
mod events;
mod leaderboard;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use events::{EventLog, EventPublisher, StoredEvent};
pub use leaderboard::{LeaderboardEntry, LeaderboardIndex, RankedEntry};
pub use repositories::{RepoResult, UserRecordRepository};
