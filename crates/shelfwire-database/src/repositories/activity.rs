//! Activity log and visibility mask repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shelfwire_core::error::{AppError, ErrorKind};
use shelfwire_core::result::AppResult;
use shelfwire_core::types::pagination::{PageRequest, PageResponse};
use shelfwire_entity::activity::ActivityEntry;

use crate::store::ActivityStore;

/// Friends-feed predicate, shared by the count and page queries: entries
/// authored by someone the viewer follows, not by the viewer, and not
/// hidden by the viewer.
const FRIENDS_FEED_WHERE: &str = "a.actor_id IN \
     (SELECT f.following_id FROM follow_edges f WHERE f.follower_id = $1) \
     AND a.actor_id <> $1 \
     AND NOT EXISTS (SELECT 1 FROM hidden_activities h \
                     WHERE h.viewer_id = $1 AND h.activity_id = a.id)";

/// Postgres-backed activity log with per-viewer hide markers.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn append(&self, entry: &ActivityEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO activity_entries \
             (id, kind, actor_id, actor_display_name, message, \
              book_id, external_book_id, book_title, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(entry.id)
        .bind(&entry.kind)
        .bind(entry.actor_id)
        .bind(&entry.actor_display_name)
        .bind(&entry.message)
        .bind(entry.book_id)
        .bind(&entry.external_book_id)
        .bind(&entry.book_title)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append activity", e))?;
        Ok(())
    }

    async fn recent(&self, page: PageRequest) -> AppResult<PageResponse<ActivityEntry>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count activity", e))?;

        let entries = sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM activity_entries ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))?;

        Ok(PageResponse::new(entries, page.page, page.size, total as u64))
    }

    async fn by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_entries WHERE actor_id = $1")
                .bind(actor_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count user activity", e)
                })?;

        let entries = sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM activity_entries WHERE actor_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(actor_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user activity", e)
        })?;

        Ok(PageResponse::new(entries, page.page, page.size, total as u64))
    }

    async fn friends_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM activity_entries a WHERE {FRIENDS_FEED_WHERE}"
        ))
        .bind(viewer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count friends feed", e)
        })?;

        let entries = sqlx::query_as::<_, ActivityEntry>(&format!(
            "SELECT a.* FROM activity_entries a WHERE {FRIENDS_FEED_WHERE} \
             ORDER BY a.created_at DESC, a.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(viewer_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list friends feed", e))?;

        Ok(PageResponse::new(entries, page.page, page.size, total as u64))
    }

    async fn find(&self, activity_id: Uuid) -> AppResult<Option<ActivityEntry>> {
        sqlx::query_as::<_, ActivityEntry>("SELECT * FROM activity_entries WHERE id = $1")
            .bind(activity_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find activity", e))
    }

    async fn hide(
        &self,
        viewer_id: Uuid,
        activity_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO hidden_activities (viewer_id, activity_id, hidden_at) \
             VALUES ($1, $2, $3) ON CONFLICT (viewer_id, activity_id) DO NOTHING",
        )
        .bind(viewer_id)
        .bind(activity_id)
        .bind(hidden_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to hide activity", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn hide_current_friend_entries(
        &self,
        viewer_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        // One statement, so a concurrently appended entry is
        // deterministically either in the snapshot or not.
        let result = sqlx::query(
            "INSERT INTO hidden_activities (viewer_id, activity_id, hidden_at) \
             SELECT $1, a.id, $2 FROM activity_entries a \
             WHERE a.actor_id IN \
                   (SELECT f.following_id FROM follow_edges f WHERE f.follower_id = $1) \
             ON CONFLICT (viewer_id, activity_id) DO NOTHING",
        )
        .bind(viewer_id)
        .bind(hidden_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear friends feed", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn unhide_all(&self, viewer_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM hidden_activities WHERE viewer_id = $1")
            .bind(viewer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unhide all", e))?;
        Ok(result.rows_affected())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        // hidden_activities rows cascade via the FK.
        let result = sqlx::query("DELETE FROM activity_entries WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge activity", e)
            })?;
        Ok(result.rows_affected())
    }
}
