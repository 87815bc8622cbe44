//! Integration test utilities for the streak server
//!
//! Drives the axum router in-process; no socket is bound.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
