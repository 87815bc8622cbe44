//! Streak engine - pure check-in computation

mod streak;

pub use streak::{advance, CHECKIN_XP_REWARD};
