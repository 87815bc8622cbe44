//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod checkins;
pub mod health;
pub mod leaderboard;
pub mod users;
