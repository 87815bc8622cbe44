//! Check-in handler

use axum::{extract::State, Json};
use streak_service::dto::UserRecordResponse;
use streak_service::CheckinService;

use crate::extractors::ApiPath;
use crate::response::ApiResult;
use crate::state::AppState;

/// Record today's check-in
///
/// POST /checkins/{username}
pub async fn checkin(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Json<UserRecordResponse>> {
    let service = CheckinService::new(state.service_context());
    let user = service.checkin(&username).await?;
    Ok(Json(UserRecordResponse::from(user)))
}
