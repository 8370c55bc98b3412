//! Notification inbox handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use shelfwire_core::types::pagination::PageResponse;
use shelfwire_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::GatewayUser;
use crate::state::AppState;

/// Query parameters for the notification list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Page number (zero-based, default: 0).
    #[serde(default)]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_size")]
    pub size: u64,
    /// When set, only unread notifications are returned.
    #[serde(default)]
    pub unread_only: bool,
}

fn default_size() -> u64 {
    20
}

/// GET /api/notifications?page=&size=&unread_only=
pub async fn list_notifications(
    State(state): State<AppState>,
    user: GatewayUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let page = shelfwire_core::types::pagination::PageRequest::new(params.page, params.size);
    let result = state
        .notification_service
        .list(user.id(), page, params.unread_only)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/count
pub async fn unread_count(
    State(state): State<AppState>,
    user: GatewayUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(user.id()).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: GatewayUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service.mark_read(user.id(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Marked as read"))))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: GatewayUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let marked = state.notification_service.mark_all_read(user.id()).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "marked": marked } }),
    ))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: GatewayUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service.delete(user.id(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Deleted"))))
}
