//! Route definitions
//!
//! API routes are mounted under /api/v1; the liveness probe sits at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{checkins, health, leaderboard, users};
use crate::state::AppState;

/// Create the main router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(checkin_routes())
        .merge(leaderboard_routes())
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register_user))
        .route("/users/seed/:count", post(users::seed_users))
        .route("/users/sync", post(users::sync_users))
        .route(
            "/users/:user_id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

/// Check-in routes
fn checkin_routes() -> Router<AppState> {
    Router::new().route("/checkins/:username", post(checkins::checkin))
}

/// Leaderboard routes
fn leaderboard_routes() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", get(leaderboard::top))
        .route("/leaderboard/users/:user_id", get(leaderboard::rank_by_id))
        .route(
            "/leaderboard/usernames/:username",
            get(leaderboard::rank_by_username),
        )
        .route("/leaderboard/rebuild", post(leaderboard::rebuild))
        .route("/leaderboard/replay", post(leaderboard::replay))
}
