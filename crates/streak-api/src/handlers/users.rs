//! User handlers
//!
//! Registration, bulk seeding, lookup, admin sync and deletion.

use axum::{extract::State, Json};
use streak_service::dto::{RegisterUserRequest, SyncResponse, UpdateUserRequest, UserRecordResponse};
use streak_service::UserService;

use crate::extractors::{ApiPath, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a user
///
/// POST /users
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> ApiResult<Created<UserRecordResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.register(request).await?;
    Ok(Created(UserRecordResponse::from(user)))
}

/// Create `user1..user{count}` with random XP
///
/// POST /users/seed/{count}
pub async fn seed_users(
    State(state): State<AppState>,
    ApiPath(count): ApiPath<usize>,
) -> ApiResult<Created<Vec<UserRecordResponse>>> {
    let service = UserService::new(state.service_context());
    let users = service.seed(count).await?;
    Ok(Created(users.into_iter().map(UserRecordResponse::from).collect()))
}

/// Re-project every record onto the leaderboard
///
/// POST /users/sync
pub async fn sync_users(State(state): State<AppState>) -> ApiResult<Json<SyncResponse>> {
    let service = UserService::new(state.service_context());
    let synced = service.sync_all().await?;
    Ok(Json(SyncResponse { synced }))
}

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<UserRecordResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.get_user(path.user_id()?).await?;
    Ok(Json(UserRecordResponse::from(user)))
}

/// Overwrite a user's counters
///
/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserRecordResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.update_user(path.user_id()?, request).await?;
    Ok(Json(UserRecordResponse::from(user)))
}

/// Delete a user, returning the removed record
///
/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<UserRecordResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.delete_user(path.user_id()?).await?;
    Ok(Json(UserRecordResponse::from(user)))
}
