//! Event trigger handlers.
//!
//! Internal endpoints for upstream services to report domain events.
//! Each one feeds the dispatcher; the HTTP response only acknowledges
//! that the event was accepted, not that anyone was online to see it.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{
    AnnouncementRequest, BookListEventRequest, FollowEventRequest, LikeEventRequest,
    ReplyEventRequest, ReviewPostedRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/events/follow
pub async fn follow(
    State(state): State<AppState>,
    Json(req): Json<FollowEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_follow(req.follower_id, &req.follower_name, req.followee_id)
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    Json(req): Json<FollowEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_unfollow(req.follower_id, &req.follower_name, req.followee_id)
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/review-posted
pub async fn review_posted(
    State(state): State<AppState>,
    Json(req): Json<ReviewPostedRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_review_posted(req.author_id, &req.author_name, &req.book.into())
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/review-liked
pub async fn review_liked(
    State(state): State<AppState>,
    Json(req): Json<LikeEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_review_liked(
            req.liker_id,
            &req.liker_name,
            req.author_id,
            req.target_id,
            &req.book.into(),
        )
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/reply-liked
pub async fn reply_liked(
    State(state): State<AppState>,
    Json(req): Json<LikeEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_reply_liked(
            req.liker_id,
            &req.liker_name,
            req.author_id,
            req.target_id,
            &req.book.into(),
        )
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/review-replied
pub async fn review_replied(
    State(state): State<AppState>,
    Json(req): Json<ReplyEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_review_replied(
            req.replier_id,
            &req.replier_name,
            req.author_id,
            req.review_id,
            &req.book.into(),
        )
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/book-list
pub async fn book_list(
    State(state): State<AppState>,
    Json(req): Json<BookListEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .dispatcher
        .on_book_list_change(req.actor_id, &req.actor_name, req.kind, &req.book.into())
        .await;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Accepted"))))
}

/// POST /api/events/announce
pub async fn announce(
    State(state): State<AppState>,
    Json(req): Json<AnnouncementRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let delivered = state.dispatcher.announce(req.message);
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "delivered": delivered } }),
    ))
}
