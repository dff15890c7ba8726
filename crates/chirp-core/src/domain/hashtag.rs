use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HashTag entity - a normalized tag row shared by many tweets.
///
/// Tag text is unique at the store level; lookups resolve to the existing
/// row when present. Tags are created on first use and never deleted by
/// this service, so orphaned tags are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashTag {
    pub id: Uuid,
    pub tag: String,
}

impl HashTag {
    /// Create a new tag row with a generated id.
    pub fn new(tag: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag,
        }
    }
}
