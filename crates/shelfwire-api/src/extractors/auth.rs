//! `GatewayUser` extractor: pulls the caller identity from the
//! `X-User-Id` header.
//!
//! Authentication itself happens at the gateway in front of this
//! service; by the time a request lands here the header is trusted.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use shelfwire_core::types::id::UserId;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct GatewayUser(pub UserId);

impl GatewayUser {
    /// Returns the caller's user id.
    pub fn id(&self) -> UserId {
        self.0
    }
}

/// Rejection for a missing or malformed identity header. Renders as 401
/// rather than the 403 used for domain-level authorization failures.
#[derive(Debug)]
pub struct MissingIdentity(&'static str);

impl IntoResponse for MissingIdentity {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.0.to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl FromRequestParts<AppState> for GatewayUser {
    type Rejection = MissingIdentity;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(MissingIdentity("Missing X-User-Id header"))?;

        let user_id = header
            .parse::<Uuid>()
            .map_err(|_| MissingIdentity("Invalid X-User-Id header"))?;

        Ok(GatewayUser(user_id))
    }
}
