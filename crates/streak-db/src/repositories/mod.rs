//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in streak-core.

mod error;
mod user_record;

pub use user_record::PgUserRecordRepository;
