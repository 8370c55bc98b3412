//! Durable notification model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::book::BookRef;

/// The kind of social event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Someone started following the recipient.
    NewFollower,
    /// Someone stopped following the recipient.
    Unfollowed,
    /// Someone liked the recipient's review.
    ReviewLike,
    /// Someone liked the recipient's reply.
    ReplyLike,
    /// Someone replied to the recipient's review.
    ReviewReply,
}

impl NotificationKind {
    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewFollower => "NEW_FOLLOWER",
            Self::Unfollowed => "UNFOLLOWED",
            Self::ReviewLike => "REVIEW_LIKE",
            Self::ReplyLike => "REPLY_LIKE",
            Self::ReviewReply => "REVIEW_REPLY",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW_FOLLOWER" => Ok(Self::NewFollower),
            "UNFOLLOWED" => Ok(Self::Unfollowed),
            "REVIEW_LIKE" => Ok(Self::ReviewLike),
            "REPLY_LIKE" => Ok(Self::ReplyLike),
            "REVIEW_REPLY" => Ok(Self::ReviewReply),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

/// A durably stored notification for one recipient.
///
/// Appended by the dispatcher at event time; only the read state ever
/// changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier (UUIDv7).
    pub id: Uuid,
    /// Event kind, stored as its wire string.
    pub kind: String,
    /// The recipient user. Always set.
    pub recipient_id: Uuid,
    /// The user whose action triggered the event. `None` for
    /// system-generated notifications.
    pub actor_id: Option<Uuid>,
    /// Display message, rendered at dispatch time.
    pub message: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Related entity kind ("FOLLOW", "REVIEW", "REPLY"), if any.
    pub related_kind: Option<String>,
    /// Related entity id, if any.
    pub related_id: Option<Uuid>,
    /// Book title snapshot for display, if the event concerns a book.
    pub book_title: Option<String>,
    /// External provider book id, if the event concerns a book.
    pub external_book_id: Option<String>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Builds a fresh unread notification with a time-ordered id.
    pub fn new(
        kind: NotificationKind,
        recipient_id: Uuid,
        actor_id: Option<Uuid>,
        message: impl Into<String>,
        related: Option<(&str, Uuid)>,
        book: Option<&BookRef>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.as_str().to_string(),
            recipient_id,
            actor_id,
            message: message.into(),
            is_read: false,
            read_at: None,
            related_kind: related.map(|(k, _)| k.to_string()),
            related_id: related.map(|(_, id)| id),
            book_title: book.and_then(|b| b.title.clone()),
            external_book_id: book.and_then(|b| b.external_book_id.clone()),
            created_at: Utc::now(),
        }
    }
}
