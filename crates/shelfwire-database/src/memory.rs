//! In-memory store implementations.
//!
//! Mirror the Postgres repositories' semantics exactly, backed by mutexed
//! vectors. Used by the integration test harness and the embedded
//! (database-less) mode; the provider split follows the same pattern as a
//! cache layer offering a memory backend next to the networked one.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shelfwire_core::result::AppResult;
use shelfwire_core::types::pagination::{PageRequest, PageResponse};
use shelfwire_entity::activity::{ActivityEntry, HiddenActivity};
use shelfwire_entity::notification::Notification;

use crate::store::{ActivityStore, FollowGraph, NotificationStore};

/// Sorts newest first: created desc, id desc (UUIDv7 ids order by time).
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn paginate<T: Clone>(sorted: Vec<T>, page: PageRequest) -> PageResponse<T> {
    let total = sorted.len() as u64;
    let content = sorted
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(content, page.page, page.size, total)
}

/// In-memory durable notification store.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn append(&self, notification: &Notification) -> AppResult<()> {
        self.rows.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |n| (n.created_at, n.id));
        Ok(paginate(rows, page))
    }

    async fn list_unread_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .cloned()
            .collect();
        newest_first(&mut rows, |n| (n.created_at, n.id));
        Ok(paginate(rows, page))
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        let count = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count();
        Ok(count as u64)
    }

    async fn find(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        for n in rows.iter_mut() {
            if n.id == notification_id && n.recipient_id == recipient_id && !n.is_read {
                n.is_read = true;
                n.read_at = Some(read_at);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn mark_all_read(&self, recipient_id: Uuid, read_at: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut changed = 0;
        for n in rows.iter_mut() {
            if n.recipient_id == recipient_id && !n.is_read {
                n.is_read = true;
                n.read_at = Some(read_at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, notification_id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| !(n.id == notification_id && n.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.created_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory activity log with per-viewer hide markers.
///
/// Needs the follow graph to evaluate the friends-feed predicate, exactly
/// as the Postgres query joins `follow_edges`.
#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    entries: Mutex<Vec<ActivityEntry>>,
    hidden: Mutex<Vec<HiddenActivity>>,
    graph: MemoryFollowGraph,
}

impl MemoryActivityStore {
    /// Create an empty store sharing state with the given follow graph.
    pub fn new(graph: MemoryFollowGraph) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            hidden: Mutex::new(Vec::new()),
            graph,
        }
    }

    fn is_hidden(&self, viewer_id: Uuid, activity_id: Uuid) -> bool {
        self.hidden
            .lock()
            .unwrap()
            .iter()
            .any(|h| h.viewer_id == viewer_id && h.activity_id == activity_id)
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn append(&self, entry: &ActivityEntry) -> AppResult<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, page: PageRequest) -> AppResult<PageResponse<ActivityEntry>> {
        let mut rows = self.entries.lock().unwrap().clone();
        newest_first(&mut rows, |a| (a.created_at, a.id));
        Ok(paginate(rows, page))
    }

    async fn by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let mut rows: Vec<ActivityEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.actor_id == actor_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |a| (a.created_at, a.id));
        Ok(paginate(rows, page))
    }

    async fn friends_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let following = self.graph.following_set(viewer_id);
        let mut rows: Vec<ActivityEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                following.contains(&a.actor_id)
                    && a.actor_id != viewer_id
                    && !self.is_hidden(viewer_id, a.id)
            })
            .cloned()
            .collect();
        newest_first(&mut rows, |a| (a.created_at, a.id));
        Ok(paginate(rows, page))
    }

    async fn find(&self, activity_id: Uuid) -> AppResult<Option<ActivityEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == activity_id)
            .cloned())
    }

    async fn hide(
        &self,
        viewer_id: Uuid,
        activity_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut hidden = self.hidden.lock().unwrap();
        if hidden
            .iter()
            .any(|h| h.viewer_id == viewer_id && h.activity_id == activity_id)
        {
            return Ok(false);
        }
        hidden.push(HiddenActivity {
            viewer_id,
            activity_id,
            hidden_at,
        });
        Ok(true)
    }

    async fn hide_current_friend_entries(
        &self,
        viewer_id: Uuid,
        hidden_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let following = self.graph.following_set(viewer_id);
        // The entries lock is held across the snapshot and the inserts, so
        // a concurrent append is either fully in or fully out.
        let entries = self.entries.lock().unwrap();
        let mut hidden = self.hidden.lock().unwrap();
        let mut inserted = 0;
        for entry in entries.iter().filter(|a| following.contains(&a.actor_id)) {
            let already = hidden
                .iter()
                .any(|h| h.viewer_id == viewer_id && h.activity_id == entry.id);
            if !already {
                hidden.push(HiddenActivity {
                    viewer_id,
                    activity_id: entry.id,
                    hidden_at,
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn unhide_all(&self, viewer_id: Uuid) -> AppResult<u64> {
        let mut hidden = self.hidden.lock().unwrap();
        let before = hidden.len();
        hidden.retain(|h| h.viewer_id != viewer_id);
        Ok((before - hidden.len()) as u64)
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut entries = self.entries.lock().unwrap();
        let mut hidden = self.hidden.lock().unwrap();
        let before = entries.len();
        let purged: HashSet<Uuid> = entries
            .iter()
            .filter(|a| a.created_at < cutoff)
            .map(|a| a.id)
            .collect();
        entries.retain(|a| a.created_at >= cutoff);
        hidden.retain(|h| !purged.contains(&h.activity_id));
        Ok((before - entries.len()) as u64)
    }
}

/// In-memory follow graph and user directory.
///
/// Cheaply cloneable; clones share state, so the activity store and the
/// dispatcher can observe the same graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryFollowGraph {
    inner: std::sync::Arc<Mutex<GraphState>>,
}

#[derive(Debug, Default)]
struct GraphState {
    users: HashSet<Uuid>,
    edges: HashSet<(Uuid, Uuid)>,
}

impl MemoryFollowGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user id as existing.
    pub fn add_user(&self, user_id: Uuid) {
        self.inner.lock().unwrap().users.insert(user_id);
    }

    /// Add a follow edge (both endpoints are registered as users).
    pub fn add_follow(&self, follower_id: Uuid, following_id: Uuid) {
        let mut state = self.inner.lock().unwrap();
        state.users.insert(follower_id);
        state.users.insert(following_id);
        state.edges.insert((follower_id, following_id));
    }

    /// Remove a follow edge.
    pub fn remove_follow(&self, follower_id: Uuid, following_id: Uuid) {
        self.inner
            .lock()
            .unwrap()
            .edges
            .remove(&(follower_id, following_id));
    }

    fn following_set(&self, follower_id: Uuid) -> HashSet<Uuid> {
        self.inner
            .lock()
            .unwrap()
            .edges
            .iter()
            .filter(|(f, _)| *f == follower_id)
            .map(|(_, t)| *t)
            .collect()
    }
}

#[async_trait]
impl FollowGraph for MemoryFollowGraph {
    async fn followers_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .edges
            .iter()
            .filter(|(_, t)| *t == user_id)
            .map(|(f, _)| *f)
            .collect())
    }

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .edges
            .contains(&(follower_id, following_id)))
    }

    async fn user_exists(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().users.contains(&user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwire_entity::activity::ActivityKind;
    use shelfwire_entity::notification::{Notification, NotificationKind};

    fn entry(actor: Uuid, msg: &str) -> ActivityEntry {
        ActivityEntry::new(ActivityKind::NewReview, actor, "Reader", msg, None)
    }

    #[tokio::test]
    async fn notifications_list_newest_first() {
        let store = MemoryNotificationStore::new();
        let user = Uuid::new_v4();
        for i in 0..3 {
            let n = Notification::new(
                NotificationKind::ReviewLike,
                user,
                None,
                format!("like {i}"),
                None,
                None,
            );
            store.append(&n).await.unwrap();
        }

        let page = store
            .list_for_recipient(user, PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content[0].message, "like 2");
        assert_eq!(page.content[2].message, "like 0");
    }

    #[tokio::test]
    async fn mark_read_second_call_changes_nothing() {
        let store = MemoryNotificationStore::new();
        let user = Uuid::new_v4();
        let n = Notification::new(NotificationKind::NewFollower, user, None, "hi", None, None);
        store.append(&n).await.unwrap();

        assert!(store.mark_read(n.id, user, Utc::now()).await.unwrap());
        assert!(!store.mark_read(n.id, user, Utc::now()).await.unwrap());
        assert_eq!(store.count_unread(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_read_requires_ownership() {
        let store = MemoryNotificationStore::new();
        let owner = Uuid::new_v4();
        let n = Notification::new(NotificationKind::NewFollower, owner, None, "hi", None, None);
        store.append(&n).await.unwrap();

        assert!(!store.mark_read(n.id, Uuid::new_v4(), Utc::now()).await.unwrap());
        assert_eq!(store.count_unread(owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn snapshot_clear_spares_later_entries() {
        let graph = MemoryFollowGraph::new();
        let store = MemoryActivityStore::new(graph.clone());
        let viewer = Uuid::new_v4();
        let friend = Uuid::new_v4();
        graph.add_follow(viewer, friend);

        let e1 = entry(friend, "before clear");
        store.append(&e1).await.unwrap();

        let cleared = store
            .hide_current_friend_entries(viewer, Utc::now())
            .await
            .unwrap();
        assert_eq!(cleared, 1);

        let e2 = entry(friend, "after clear");
        store.append(&e2).await.unwrap();

        let feed = store
            .friends_feed(viewer, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.content.len(), 1);
        assert_eq!(feed.content[0].id, e2.id);
    }

    #[tokio::test]
    async fn friends_feed_excludes_own_entries() {
        let graph = MemoryFollowGraph::new();
        let store = MemoryActivityStore::new(graph.clone());
        let viewer = Uuid::new_v4();
        let friend = Uuid::new_v4();
        graph.add_follow(viewer, friend);
        // Degenerate self-edge should still not surface own entries.
        graph.add_follow(viewer, viewer);

        store.append(&entry(viewer, "mine")).await.unwrap();
        store.append(&entry(friend, "theirs")).await.unwrap();

        let feed = store
            .friends_feed(viewer, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.content.len(), 1);
        assert_eq!(feed.content[0].message, "theirs");
    }

    #[tokio::test]
    async fn purge_cascades_hide_markers() {
        let graph = MemoryFollowGraph::new();
        let store = MemoryActivityStore::new(graph.clone());
        let viewer = Uuid::new_v4();
        let friend = Uuid::new_v4();
        graph.add_follow(viewer, friend);

        let e = entry(friend, "old");
        store.append(&e).await.unwrap();
        store.hide(viewer, e.id, Utc::now()).await.unwrap();

        let purged = store
            .purge_older_than(Utc::now() + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(purged, 1);
        assert_eq!(store.hidden.lock().unwrap().len(), 0);
    }
}
