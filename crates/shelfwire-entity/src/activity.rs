//! Activity feed models: append-only entries and per-viewer hide markers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::book::BookRef;

/// The kind of action an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    NewFollower,
    Unfollowed,
    NewReview,
    ReviewLike,
    ReviewReply,
    BookAddedToTbr,
    BookAddedToCurrentlyReading,
    BookMarkedAsRead,
    BookRemovedFromList,
}

impl ActivityKind {
    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewFollower => "NEW_FOLLOWER",
            Self::Unfollowed => "UNFOLLOWED",
            Self::NewReview => "NEW_REVIEW",
            Self::ReviewLike => "REVIEW_LIKE",
            Self::ReviewReply => "REVIEW_REPLY",
            Self::BookAddedToTbr => "BOOK_ADDED_TO_TBR",
            Self::BookAddedToCurrentlyReading => "BOOK_ADDED_TO_CURRENTLY_READING",
            Self::BookMarkedAsRead => "BOOK_MARKED_AS_READ",
            Self::BookRemovedFromList => "BOOK_REMOVED_FROM_LIST",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW_FOLLOWER" => Ok(Self::NewFollower),
            "UNFOLLOWED" => Ok(Self::Unfollowed),
            "NEW_REVIEW" => Ok(Self::NewReview),
            "REVIEW_LIKE" => Ok(Self::ReviewLike),
            "REVIEW_REPLY" => Ok(Self::ReviewReply),
            "BOOK_ADDED_TO_TBR" => Ok(Self::BookAddedToTbr),
            "BOOK_ADDED_TO_CURRENTLY_READING" => Ok(Self::BookAddedToCurrentlyReading),
            "BOOK_MARKED_AS_READ" => Ok(Self::BookMarkedAsRead),
            "BOOK_REMOVED_FROM_LIST" => Ok(Self::BookRemovedFromList),
            other => Err(format!("unknown activity kind: {other}")),
        }
    }
}

/// One entry in the shared, append-only activity log.
///
/// Entries are immutable after creation. Per-viewer visibility is an
/// overlay ([`HiddenActivity`]); the log itself never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Unique entry identifier (UUIDv7).
    pub id: Uuid,
    /// Activity kind, stored as its wire string.
    pub kind: String,
    /// The user whose action this entry records.
    pub actor_id: Uuid,
    /// Actor display name, snapshotted at write time.
    pub actor_display_name: String,
    /// Display message, rendered at write time.
    pub message: String,
    /// Local catalog book id, if the activity concerns a book.
    pub book_id: Option<Uuid>,
    /// External provider book id, if the activity concerns a book.
    pub external_book_id: Option<String>,
    /// Book title snapshot, if the activity concerns a book.
    pub book_title: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Builds a fresh entry with a time-ordered id.
    pub fn new(
        kind: ActivityKind,
        actor_id: Uuid,
        actor_display_name: impl Into<String>,
        message: impl Into<String>,
        book: Option<&BookRef>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.as_str().to_string(),
            actor_id,
            actor_display_name: actor_display_name.into(),
            message: message.into(),
            book_id: book.and_then(|b| b.book_id),
            external_book_id: book.and_then(|b| b.external_book_id.clone()),
            book_title: book.and_then(|b| b.title.clone()),
            created_at: Utc::now(),
        }
    }
}

/// A per-viewer hide marker: "viewer does not want to see this entry".
///
/// Unique per (viewer, activity) pair; existence is the sole signal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HiddenActivity {
    /// The viewer hiding the entry.
    pub viewer_id: Uuid,
    /// The hidden activity entry.
    pub activity_id: Uuid,
    /// When the entry was hidden.
    pub hidden_at: DateTime<Utc>,
}
