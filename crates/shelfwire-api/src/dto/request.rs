//! Request DTOs for the event trigger endpoints.
//!
//! Upstream services (follow graph, reviews, reading lists) report their
//! domain events through these payloads; the dispatcher turns them into
//! notifications and activity entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfwire_entity::activity::ActivityKind;
use shelfwire_entity::book::BookRef;

/// Book details attached to an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    /// Local catalog book id.
    pub book_id: Option<Uuid>,
    /// External provider book id.
    pub external_book_id: Option<String>,
    /// Title snapshot.
    pub title: Option<String>,
}

impl From<BookPayload> for BookRef {
    fn from(p: BookPayload) -> Self {
        BookRef {
            book_id: p.book_id,
            external_book_id: p.external_book_id,
            title: p.title,
        }
    }
}

/// POST /api/events/follow and /api/events/unfollow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEventRequest {
    /// The user doing the (un)following.
    pub follower_id: Uuid,
    /// Display name of the follower.
    pub follower_name: String,
    /// The user being (un)followed.
    pub followee_id: Uuid,
}

/// POST /api/events/review-posted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPostedRequest {
    /// The review's author.
    pub author_id: Uuid,
    /// Display name of the author.
    pub author_name: String,
    /// The reviewed book.
    pub book: BookPayload,
}

/// POST /api/events/review-liked and /api/events/reply-liked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEventRequest {
    /// The user who liked.
    pub liker_id: Uuid,
    /// Display name of the liker.
    pub liker_name: String,
    /// Author of the liked review or reply.
    pub author_id: Uuid,
    /// The liked review or reply.
    pub target_id: Uuid,
    /// The book under review.
    pub book: BookPayload,
}

/// POST /api/events/review-replied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEventRequest {
    /// The user who replied.
    pub replier_id: Uuid,
    /// Display name of the replier.
    pub replier_name: String,
    /// Author of the review being replied to.
    pub author_id: Uuid,
    /// The review being replied to.
    pub review_id: Uuid,
    /// The book under review.
    pub book: BookPayload,
}

/// POST /api/events/book-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookListEventRequest {
    /// The user who changed their list.
    pub actor_id: Uuid,
    /// Display name of the actor.
    pub actor_name: String,
    /// Which list change happened.
    pub kind: ActivityKind,
    /// The book that moved.
    pub book: BookPayload,
}

/// POST /api/events/announce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementRequest {
    /// Message broadcast to every connection.
    pub message: String,
}
