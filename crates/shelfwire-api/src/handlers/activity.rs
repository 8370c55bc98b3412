//! Activity feed handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use shelfwire_core::error::AppError;
use shelfwire_core::types::pagination::PageResponse;
use shelfwire_entity::activity::ActivityEntry;
use shelfwire_service::activity::HideOutcome;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{GatewayUser, PaginationParams};
use crate::state::AppState;

/// GET /api/activity/recent
pub async fn recent(
    State(state): State<AppState>,
    _user: GatewayUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ActivityEntry>>>, ApiError> {
    let result = state
        .activity_service
        .recent(params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/activity/friends
pub async fn friends_feed(
    State(state): State<AppState>,
    user: GatewayUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ActivityEntry>>>, ApiError> {
    let result = state
        .activity_service
        .friends_feed(user.id(), params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/activity/user/{id}
pub async fn user_feed(
    State(state): State<AppState>,
    _user: GatewayUser,
    Path(actor_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ActivityEntry>>>, ApiError> {
    let result = state
        .activity_service
        .user_feed(actor_id, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// DELETE /api/activity/{id}. Hides the entry for the caller only.
pub async fn hide(
    State(state): State<AppState>,
    user: GatewayUser,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    match state.activity_service.hide_entry(user.id(), activity_id).await? {
        HideOutcome::Hidden => Ok(Json(ApiResponse::ok(MessageResponse::new("Hidden")))),
        HideOutcome::NotPermitted => Err(AppError::authorization(
            "Not permitted to hide this activity",
        )
        .into()),
        HideOutcome::NotFound => {
            Err(AppError::not_found(format!("Activity {activity_id} not found")).into())
        }
    }
}

/// DELETE /api/activity/clear-friends-feed
pub async fn clear_friends_feed(
    State(state): State<AppState>,
    user: GatewayUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let hidden = state.activity_service.clear_friends_feed(user.id()).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "hidden": hidden } }),
    ))
}

/// POST /api/activity/unhide-all
pub async fn unhide_all(
    State(state): State<AppState>,
    user: GatewayUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let restored = state.activity_service.unhide_all(user.id()).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "restored": restored } }),
    ))
}
