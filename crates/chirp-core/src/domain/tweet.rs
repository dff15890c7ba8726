use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tweet entity - a short authored post with optional hashtags.
///
/// The id is assigned once at creation and never reused. A tweet is either
/// present in the store or deleted; there is no soft-delete state and no
/// mutation after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: Uuid,
    pub username: String,
    pub body: String,
    /// Deduplicated tag texts, at most five.
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    /// Create a new tweet with generated id and server-assigned timestamp.
    pub fn new(username: String, body: String, hashtags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            body,
            hashtags,
            created_at: Utc::now(),
        }
    }

    /// Whether the given identity owns this tweet. Ownership is exact
    /// string equality on the author username.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }
}
