//! Axum extractors for request handling
//!
//! Wrappers that turn axum rejections into [`ApiError`](crate::response::ApiError)
//! so every failure shares the JSON error body.

mod path;
mod query;
mod validated;

pub use path::{ApiPath, UserIdPath};
pub use query::ApiQuery;
pub use validated::ValidatedJson;
