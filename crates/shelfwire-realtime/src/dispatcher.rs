//! Notification dispatcher: turns domain events into durable rows and
//! live pushes.
//!
//! Every event follows the same order: persist first, push second. The
//! durable copy is the source of truth; a missed live push is recovered
//! the next time the client lists notifications.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use shelfwire_core::types::id::UserId;
use shelfwire_database::{ActivityStore, FollowGraph, NotificationStore};
use shelfwire_entity::activity::{ActivityEntry, ActivityKind};
use shelfwire_entity::book::BookRef;
use shelfwire_entity::notification::{Notification, NotificationKind};

use crate::connection::registry::ConnectionRegistry;
use crate::message::ServerMessage;

/// Dispatches social events: persists notifications and activity entries,
/// then pushes to online recipients over WebSocket.
pub struct NotificationDispatcher {
    registry: Arc<ConnectionRegistry>,
    notifications: Arc<dyn NotificationStore>,
    activities: Arc<dyn ActivityStore>,
    follows: Arc<dyn FollowGraph>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher over the given registry and stores.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        notifications: Arc<dyn NotificationStore>,
        activities: Arc<dyn ActivityStore>,
        follows: Arc<dyn FollowGraph>,
    ) -> Self {
        Self {
            registry,
            notifications,
            activities,
            follows,
        }
    }

    /// Core delivery primitive: persist a notification for one recipient,
    /// then push it to their live connections.
    ///
    /// Users never get notified about their own actions. A vanished
    /// recipient is skipped silently; a failed graph lookup does not block
    /// delivery. Persistence failures are logged and swallowed so one bad
    /// write never takes the triggering request down.
    pub async fn notify(
        &self,
        recipient_id: UserId,
        actor_id: Option<UserId>,
        kind: NotificationKind,
        message: String,
        related: Option<(&str, Uuid)>,
        book: Option<&BookRef>,
    ) {
        if actor_id == Some(recipient_id) {
            debug!(user_id = %recipient_id, "skipping self-notification");
            return;
        }

        match self.follows.user_exists(recipient_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(recipient_id = %recipient_id, "recipient no longer exists, skipping");
                return;
            }
            Err(e) => {
                warn!(
                    recipient_id = %recipient_id,
                    error = %e,
                    "recipient lookup failed, delivering anyway"
                );
            }
        }

        let notification = Notification::new(kind, recipient_id, actor_id, message, related, book);
        if let Err(e) = self.notifications.append(&notification).await {
            error!(
                recipient_id = %recipient_id,
                kind = %kind,
                error = %e,
                "failed to persist notification"
            );
        }

        let pushed = self.registry.send_to_user(
            &recipient_id,
            &ServerMessage::Notification {
                id: notification.id,
                kind: notification.kind.clone(),
                message: notification.message.clone(),
                actor_id: notification.actor_id,
                timestamp: notification.created_at.timestamp_millis(),
            },
        );
        debug!(
            recipient_id = %recipient_id,
            kind = %kind,
            pushed,
            "notification dispatched"
        );
    }

    /// Records an activity entry and fans a live update out to everyone
    /// following the actor.
    pub async fn publish_activity(
        &self,
        kind: ActivityKind,
        actor_id: UserId,
        actor_display_name: &str,
        message: String,
        book: Option<&BookRef>,
    ) {
        let entry = ActivityEntry::new(kind, actor_id, actor_display_name, message, book);
        if let Err(e) = self.activities.append(&entry).await {
            error!(actor_id = %actor_id, kind = %kind, error = %e, "failed to persist activity");
            return;
        }

        let followers = match self.follows.followers_of(actor_id).await {
            Ok(followers) => followers,
            Err(e) => {
                warn!(actor_id = %actor_id, error = %e, "follower lookup failed, no fan-out");
                return;
            }
        };

        let update = ServerMessage::ActivityUpdate {
            id: entry.id,
            kind: entry.kind.clone(),
            message: entry.message.clone(),
            actor_display_name: entry.actor_display_name.clone(),
            timestamp: entry.created_at.timestamp_millis(),
        };
        let mut pushed = 0usize;
        for follower in followers {
            if follower == actor_id {
                continue;
            }
            if self.registry.send_to_user(&follower, &update) {
                pushed += 1;
            }
        }
        debug!(actor_id = %actor_id, kind = %kind, pushed, "activity published");
    }

    /// A user started following another user.
    pub async fn on_follow(&self, follower_id: UserId, follower_name: &str, followee_id: UserId) {
        self.notify(
            followee_id,
            Some(follower_id),
            NotificationKind::NewFollower,
            format!("{follower_name} started following you!"),
            Some(("FOLLOW", follower_id)),
            None,
        )
        .await;
        self.publish_activity(
            ActivityKind::NewFollower,
            follower_id,
            follower_name,
            format!("{follower_name} followed a reader"),
            None,
        )
        .await;
    }

    /// A user stopped following another user.
    pub async fn on_unfollow(&self, follower_id: UserId, follower_name: &str, followee_id: UserId) {
        self.notify(
            followee_id,
            Some(follower_id),
            NotificationKind::Unfollowed,
            format!("{follower_name} unfollowed you"),
            Some(("FOLLOW", follower_id)),
            None,
        )
        .await;
    }

    /// A user posted a review. Activity only, nobody is notified directly.
    pub async fn on_review_posted(
        &self,
        author_id: UserId,
        author_name: &str,
        book: &BookRef,
    ) {
        let title = book.title.as_deref().unwrap_or("a book");
        self.publish_activity(
            ActivityKind::NewReview,
            author_id,
            author_name,
            format!("{author_name} reviewed \"{title}\""),
            Some(book),
        )
        .await;
    }

    /// Someone liked a review.
    pub async fn on_review_liked(
        &self,
        liker_id: UserId,
        liker_name: &str,
        author_id: UserId,
        review_id: Uuid,
        book: &BookRef,
    ) {
        let title = book.title.as_deref().unwrap_or("a book");
        self.notify(
            author_id,
            Some(liker_id),
            NotificationKind::ReviewLike,
            format!("{liker_name} liked your review of \"{title}\""),
            Some(("REVIEW", review_id)),
            Some(book),
        )
        .await;
        self.publish_activity(
            ActivityKind::ReviewLike,
            liker_id,
            liker_name,
            format!("{liker_name} liked a review of \"{title}\""),
            Some(book),
        )
        .await;
    }

    /// Someone liked a reply under a review.
    pub async fn on_reply_liked(
        &self,
        liker_id: UserId,
        liker_name: &str,
        author_id: UserId,
        reply_id: Uuid,
        book: &BookRef,
    ) {
        let title = book.title.as_deref().unwrap_or("a book");
        self.notify(
            author_id,
            Some(liker_id),
            NotificationKind::ReplyLike,
            format!("{liker_name} liked your reply on \"{title}\""),
            Some(("REPLY", reply_id)),
            Some(book),
        )
        .await;
    }

    /// Someone replied to a review.
    pub async fn on_review_replied(
        &self,
        replier_id: UserId,
        replier_name: &str,
        author_id: UserId,
        review_id: Uuid,
        book: &BookRef,
    ) {
        let title = book.title.as_deref().unwrap_or("a book");
        self.notify(
            author_id,
            Some(replier_id),
            NotificationKind::ReviewReply,
            format!("{replier_name} replied to your review of \"{title}\""),
            Some(("REVIEW", review_id)),
            Some(book),
        )
        .await;
        self.publish_activity(
            ActivityKind::ReviewReply,
            replier_id,
            replier_name,
            format!("{replier_name} replied to a review of \"{title}\""),
            Some(book),
        )
        .await;
    }

    /// A user moved a book between their reading lists. Activity only.
    pub async fn on_book_list_change(
        &self,
        actor_id: UserId,
        actor_name: &str,
        kind: ActivityKind,
        book: &BookRef,
    ) {
        let title = book.title.as_deref().unwrap_or("a book");
        let message = match kind {
            ActivityKind::BookAddedToTbr => {
                format!("{actor_name} added \"{title}\" to their to-be-read list")
            }
            ActivityKind::BookAddedToCurrentlyReading => {
                format!("{actor_name} started reading \"{title}\"")
            }
            ActivityKind::BookMarkedAsRead => {
                format!("{actor_name} finished reading \"{title}\"")
            }
            ActivityKind::BookRemovedFromList => {
                format!("{actor_name} removed \"{title}\" from their lists")
            }
            other => format!("{actor_name} updated \"{title}\" ({other})"),
        };
        self.publish_activity(kind, actor_id, actor_name, message, Some(book)).await;
    }

    /// Broadcasts an announcement to every connection.
    pub fn announce(&self, message: String) -> usize {
        self.registry.broadcast(&ServerMessage::Announcement {
            message,
            timestamp: ServerMessage::now_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwire_core::config::realtime::RealtimeConfig;
    use shelfwire_core::types::pagination::PageRequest;
    use shelfwire_database::memory::{
        MemoryActivityStore, MemoryFollowGraph, MemoryNotificationStore,
    };

    struct Harness {
        dispatcher: NotificationDispatcher,
        registry: Arc<ConnectionRegistry>,
        notifications: Arc<MemoryNotificationStore>,
        activities: Arc<MemoryActivityStore>,
        graph: MemoryFollowGraph,
    }

    fn harness() -> Harness {
        let registry = Arc::new(ConnectionRegistry::new(RealtimeConfig {
            send_buffer_size: 8,
            max_connections_per_user: 4,
        }));
        let graph = MemoryFollowGraph::new();
        let notifications = Arc::new(MemoryNotificationStore::new());
        let activities = Arc::new(MemoryActivityStore::new(graph.clone()));
        let dispatcher = NotificationDispatcher::new(
            registry.clone(),
            notifications.clone(),
            activities.clone(),
            Arc::new(graph.clone()),
        );
        Harness {
            dispatcher,
            registry,
            notifications,
            activities,
            graph,
        }
    }

    #[tokio::test]
    async fn follow_persists_even_when_recipient_offline() {
        let h = harness();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        h.graph.add_user(alice);
        h.graph.add_user(bob);

        h.dispatcher.on_follow(alice, "alice", bob).await;

        let page = h
            .notifications
            .list_for_recipient(bob, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].message, "alice started following you!");
        assert_eq!(page.content[0].kind, "NEW_FOLLOWER");
        assert!(!page.content[0].is_read);
    }

    #[tokio::test]
    async fn online_recipient_gets_live_push() {
        let h = harness();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        h.graph.add_user(alice);
        h.graph.add_user(bob);

        let (conn, mut rx) = h.registry.register();
        h.registry.identify(&conn.id, bob);

        h.dispatcher.on_follow(alice, "alice", bob).await;

        let msg = rx.try_recv().unwrap();
        match msg {
            ServerMessage::Notification { kind, actor_id, .. } => {
                assert_eq!(kind, "NEW_FOLLOWER");
                assert_eq!(actor_id, Some(alice));
            }
            other => panic!("expected notification push, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn self_events_are_suppressed() {
        let h = harness();
        let alice = Uuid::now_v7();
        h.graph.add_user(alice);

        let book = BookRef::external("ext-1", "Dune");
        h.dispatcher
            .on_review_liked(alice, "alice", alice, Uuid::now_v7(), &book)
            .await;

        let page = h
            .notifications
            .list_for_recipient(alice, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn vanished_recipient_is_skipped() {
        let h = harness();
        let alice = Uuid::now_v7();
        let ghost = Uuid::now_v7();
        h.graph.add_user(alice);

        h.dispatcher.on_unfollow(alice, "alice", ghost).await;

        let page = h
            .notifications
            .list_for_recipient(ghost, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn activity_fans_out_to_followers_only() {
        let h = harness();
        let author = Uuid::now_v7();
        let follower = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        for u in [author, follower, stranger] {
            h.graph.add_user(u);
        }
        h.graph.add_follow(follower, author);

        let (follower_conn, mut follower_rx) = h.registry.register();
        h.registry.identify(&follower_conn.id, follower);
        let (stranger_conn, mut stranger_rx) = h.registry.register();
        h.registry.identify(&stranger_conn.id, stranger);

        let book = BookRef::external("ext-2", "Hyperion");
        h.dispatcher.on_review_posted(author, "casey", &book).await;

        match follower_rx.try_recv().unwrap() {
            ServerMessage::ActivityUpdate { kind, .. } => assert_eq!(kind, "NEW_REVIEW"),
            other => panic!("expected activity update, got {other:?}"),
        }
        assert!(stranger_rx.try_recv().is_err());

        let feed = h.activities.recent(PageRequest::default()).await.unwrap();
        assert_eq!(feed.total_elements, 1);
        assert_eq!(feed.content[0].actor_display_name, "casey");
    }

    #[tokio::test]
    async fn book_list_change_records_activity_message() {
        let h = harness();
        let reader = Uuid::now_v7();
        h.graph.add_user(reader);

        let book = BookRef::external("ext-3", "Piranesi");
        h.dispatcher
            .on_book_list_change(reader, "drew", ActivityKind::BookMarkedAsRead, &book)
            .await;

        let feed = h.activities.recent(PageRequest::default()).await.unwrap();
        assert_eq!(feed.content[0].message, "drew finished reading \"Piranesi\"");
        assert_eq!(feed.content[0].kind, "BOOK_MARKED_AS_READ");
    }

    #[tokio::test]
    async fn announce_reaches_every_connection() {
        let h = harness();
        let (_a, mut rx_a) = h.registry.register();
        let (_b, mut rx_b) = h.registry.register();

        assert_eq!(h.dispatcher.announce("downtime at 03:00".to_string()), 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }
}
