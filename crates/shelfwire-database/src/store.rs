//! Store traits: the seams between business logic and persistence.
//!
//! Two implementations exist for each trait: a Postgres repository
//! (`repositories`) used in production and an in-memory store (`memory`)
//! used by the test harness and embedded mode. Services and the dispatcher
//! depend only on these traits, so every delivery and visibility invariant
//! can be exercised without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shelfwire_core::result::AppResult;
use shelfwire_core::types::pagination::{PageRequest, PageResponse};
use shelfwire_entity::activity::ActivityEntry;
use shelfwire_entity::notification::Notification;

/// Durable, append-mostly log of notifications per recipient.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Append a notification. The id and created timestamp come with the
    /// entity; the store must not reorder or rewrite them.
    async fn append(&self, notification: &Notification) -> AppResult<()>;

    /// List a recipient's notifications, newest first (created desc,
    /// id desc tie-break).
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// List only unread notifications, newest first.
    async fn list_unread_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Count unread notifications for a recipient.
    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Look up a single notification.
    async fn find(&self, notification_id: Uuid) -> AppResult<Option<Notification>>;

    /// Mark one notification read, ownership-checked.
    ///
    /// Returns `true` only when a row actually transitioned from unread to
    /// read; not-found, not-owned, and already-read all return `false`, so
    /// a repeated call reports zero rows changed.
    async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Mark every unread notification read for a recipient. Returns the
    /// number of rows changed.
    async fn mark_all_read(&self, recipient_id: Uuid, read_at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete one notification, ownership-checked. Returns `true` if a row
    /// was removed.
    async fn delete(&self, notification_id: Uuid, recipient_id: Uuid) -> AppResult<bool>;

    /// Retention sweep: delete notifications created before the cutoff,
    /// regardless of owner or read state. Returns rows removed.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Append-only activity log plus the per-viewer visibility mask.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Append an immutable entry to the log.
    async fn append(&self, entry: &ActivityEntry) -> AppResult<()>;

    /// Global feed: all entries, newest first, no masking.
    async fn recent(&self, page: PageRequest) -> AppResult<PageResponse<ActivityEntry>>;

    /// Per-user feed: entries authored by one actor, newest first, no
    /// masking.
    async fn by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>>;

    /// Friends feed for a viewer: entries authored by users the viewer
    /// follows, excluding the viewer's own entries and entries the viewer
    /// has hidden, newest first.
    async fn friends_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>>;

    /// Look up a single entry.
    async fn find(&self, activity_id: Uuid) -> AppResult<Option<ActivityEntry>>;

    /// Insert a hide marker for (viewer, entry). Idempotent: returns
    /// `false` when the marker already existed.
    async fn hide(
        &self,
        viewer_id: Uuid,
        activity_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Snapshot clear: hide every entry currently authored by someone the
    /// viewer follows, in one atomic operation. Entries created after the
    /// call are unaffected. Returns the number of new hide markers.
    async fn hide_current_friend_entries(
        &self,
        viewer_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Remove every hide marker for a viewer. Returns rows removed.
    async fn unhide_all(&self, viewer_id: Uuid) -> AppResult<u64>;

    /// Retention sweep: delete entries created before the cutoff, cascading
    /// their hide markers. Returns entries removed.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Read-only view of the externally owned follow graph and user directory.
#[async_trait]
pub trait FollowGraph: Send + Sync + 'static {
    /// All users following `user_id` (fan-out recipients).
    async fn followers_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Whether `follower_id` follows `following_id`.
    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<bool>;

    /// Whether the user still exists in the account system.
    async fn user_exists(&self, user_id: Uuid) -> AppResult<bool>;
}
