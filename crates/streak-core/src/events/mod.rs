//! Leaderboard events - immutable facts appended to the event stream

mod leaderboard_event;

pub use leaderboard_event::{LeaderboardEvent, LeaderboardEventKind};
