//! Domain entities - core business objects

mod user_record;

pub use user_record::{NewUserRecord, UserRecord};
