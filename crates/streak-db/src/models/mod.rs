//! Database models - SQLx-compatible structs for PostgreSQL tables

mod user_record;

pub use user_record::UserRecordModel;
