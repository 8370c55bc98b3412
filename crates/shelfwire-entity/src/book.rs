//! Book reference value type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to a book, carried on notifications and activity entries for
/// display. Either the local catalog id, the external provider id, or both
/// may be present; the title is a snapshot taken at write time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    /// Local catalog book id.
    pub book_id: Option<Uuid>,
    /// External provider book id (e.g. a Google Books volume id).
    pub external_book_id: Option<String>,
    /// Title snapshot, denormalized at write time.
    pub title: Option<String>,
}

impl BookRef {
    /// A reference by title and external id only.
    pub fn external(external_book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: None,
            external_book_id: Some(external_book_id.into()),
            title: Some(title.into()),
        }
    }
}
