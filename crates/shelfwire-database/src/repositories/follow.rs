//! Follow graph read-side repository.
//!
//! The `users` and `follow_edges` tables are a read replica owned by the
//! account system; Shelfwire only ever queries them.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shelfwire_core::error::{AppError, ErrorKind};
use shelfwire_core::result::AppResult;

use crate::store::FollowGraph;

/// Postgres-backed follow graph reader.
#[derive(Debug, Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    /// Create a new follow graph reader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowGraph for FollowRepository {
    async fn followers_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT follower_id FROM follow_edges WHERE following_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list followers", e))
    }

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follow_edges \
             WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check follow edge", e))?;
        Ok(exists)
    }

    async fn user_exists(&self, user_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check user", e))?;
        Ok(exists)
    }
}
