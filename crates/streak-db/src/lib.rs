//! # streak-db
//!
//! Record Store on PostgreSQL via SQLx.
//!
//! - Connection pool management and schema migrations
//! - `user_records` row model with a `FromRow` derive
//! - Row → entity mapper
//! - [`PgUserRecordRepository`], the `UserRecordRepository` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use streak_db::{create_pool, run_migrations, DatabaseConfig, PgUserRecordRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_url("postgres://localhost/streaks")).await?;
//!     run_migrations(&pool).await?;
//!     let records = PgUserRecordRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::PgUserRecordRepository;
