//! Identifier aliases.
//!
//! All persistent identifiers are UUIDv7, so lexicographic id order matches
//! insertion order and can break creation-timestamp ties deterministically.

use uuid::Uuid;

/// A user identifier (owned by the external account system).
pub type UserId = Uuid;
