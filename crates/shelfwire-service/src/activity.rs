//! Activity feeds and the per-viewer visibility mask.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use shelfwire_core::result::AppResult;
use shelfwire_core::types::id::UserId;
use shelfwire_core::types::pagination::{PageRequest, PageResponse};
use shelfwire_database::{ActivityStore, FollowGraph};
use shelfwire_entity::activity::ActivityEntry;

/// Result of a hide request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    /// The entry is hidden for the viewer (also on repeat calls).
    Hidden,
    /// The viewer is neither the author nor a follower of the author.
    NotPermitted,
    /// No such entry.
    NotFound,
}

/// Serves the activity feeds and manages what each viewer sees.
///
/// The log itself is append-only and shared; hiding is a per-viewer
/// overlay that never removes entries for anyone else.
#[derive(Clone)]
pub struct ActivityFeedService {
    store: Arc<dyn ActivityStore>,
    follows: Arc<dyn FollowGraph>,
}

impl ActivityFeedService {
    /// Creates a new service over the activity store and follow graph.
    pub fn new(store: Arc<dyn ActivityStore>, follows: Arc<dyn FollowGraph>) -> Self {
        Self { store, follows }
    }

    /// Global feed: everything, newest first, no masking.
    pub async fn recent(&self, page: PageRequest) -> AppResult<PageResponse<ActivityEntry>> {
        self.store.recent(page).await
    }

    /// One user's authored entries, newest first, no masking.
    pub async fn user_feed(
        &self,
        actor_id: UserId,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        self.store.by_actor(actor_id, page).await
    }

    /// Friends feed for a viewer: entries by users the viewer follows,
    /// minus the viewer's own entries and anything they have hidden.
    pub async fn friends_feed(
        &self,
        viewer_id: UserId,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        self.store.friends_feed(viewer_id, page).await
    }

    /// Hides one entry from the viewer's feeds.
    ///
    /// Allowed for the entry's author and for viewers following the
    /// author; anyone else has no business masking it. Repeat calls on an
    /// already-hidden entry succeed.
    pub async fn hide_entry(&self, viewer_id: UserId, activity_id: Uuid) -> AppResult<HideOutcome> {
        let Some(entry) = self.store.find(activity_id).await? else {
            return Ok(HideOutcome::NotFound);
        };

        let permitted = entry.actor_id == viewer_id
            || self.follows.is_following(viewer_id, entry.actor_id).await?;
        if !permitted {
            return Ok(HideOutcome::NotPermitted);
        }

        self.store.hide(viewer_id, activity_id, Utc::now()).await?;
        Ok(HideOutcome::Hidden)
    }

    /// Clears the viewer's friends feed as it stands right now.
    ///
    /// Hides every entry currently authored by someone the viewer
    /// follows, in one snapshot. Entries appended after the call show up
    /// normally. Returns the number of entries newly hidden.
    pub async fn clear_friends_feed(&self, viewer_id: UserId) -> AppResult<u64> {
        let hidden = self
            .store
            .hide_current_friend_entries(viewer_id, Utc::now())
            .await?;
        info!(viewer_id = %viewer_id, hidden, "cleared friends feed");
        Ok(hidden)
    }

    /// Removes every hide marker the viewer has. Returns markers removed.
    pub async fn unhide_all(&self, viewer_id: UserId) -> AppResult<u64> {
        self.store.unhide_all(viewer_id).await
    }

    /// Retention sweep: removes entries older than `retention_days`,
    /// cascading their hide markers.
    pub async fn cleanup_old(&self, retention_days: u32) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let removed = self.store.purge_older_than(cutoff).await?;
        if removed > 0 {
            info!(removed, %cutoff, "purged old activity entries");
        }
        Ok(removed)
    }
}
