//! Leaderboard handlers
//!
//! Queries against the index, plus the two drift-recovery operations.

use axum::{extract::State, Json};
use streak_service::dto::mappers::ranked_entries;
use streak_service::dto::{
    LeaderboardEntryResponse, LeaderboardQuery, RankResponse, RebuildResponse, ReplayResponse,
};
use streak_service::LeaderboardService;

use crate::extractors::{ApiPath, ApiQuery, UserIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Top members by XP
///
/// GET /leaderboard?limit=N
pub async fn top(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardEntryResponse>>> {
    let service = LeaderboardService::new(state.service_context());
    let entries = service.top(query.limit).await?;
    Ok(Json(ranked_entries(entries)))
}

/// GET /leaderboard/users/{user_id}
pub async fn rank_by_id(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<RankResponse>> {
    let service = LeaderboardService::new(state.service_context());
    let entry = service.rank(path.user_id()?).await?;
    Ok(Json(RankResponse::from(entry)))
}

/// GET /leaderboard/usernames/{username}
pub async fn rank_by_username(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Json<RankResponse>> {
    let service = LeaderboardService::new(state.service_context());
    let entry = service.rank_by_username(&username).await?;
    Ok(Json(RankResponse::from(entry)))
}

/// Reload the index from the record store
///
/// POST /leaderboard/rebuild
pub async fn rebuild(State(state): State<AppState>) -> ApiResult<Json<RebuildResponse>> {
    let service = LeaderboardService::new(state.service_context());
    let rebuilt = service.rebuild().await?;
    Ok(Json(RebuildResponse { rebuilt }))
}

/// Reload the index from the event stream
///
/// POST /leaderboard/replay
pub async fn replay(State(state): State<AppState>) -> ApiResult<Json<ReplayResponse>> {
    let service = LeaderboardService::new(state.service_context());
    let outcome = service.replay().await?;
    Ok(Json(ReplayResponse::from(outcome)))
}
