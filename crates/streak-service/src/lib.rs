//! # streak-service
//!
//! Application layer: the check-in orchestrator, user administration, and
//! leaderboard queries and recovery, composed over the ports of `streak-core`.

pub mod dto;
pub mod services;

pub use services::{
    CheckinService, IoPolicy, KeyedLocks, LeaderboardProjector, LeaderboardService, ReplayOutcome,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
