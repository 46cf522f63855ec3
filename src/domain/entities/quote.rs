//! Status quotes and image comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ImageId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub i64);

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A status quote shown under a user's gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub owner: UserId,
    pub text: String,
    pub position: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub i64);

/// A comment left on a gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub image: ImageId,
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Snapshot posted to the storage channel after profile text changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBackup {
    pub user_id: String,
    pub username: Option<String>,
    pub quotes: Vec<BackupQuote>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupQuote {
    pub text: String,
    pub position: i32,
}

impl ProfileBackup {
    #[must_use]
    pub fn new(user: UserId, username: Option<String>, quotes: &[Quote]) -> Self {
        Self {
            user_id: user.to_string(),
            username,
            quotes: quotes
                .iter()
                .map(|q| BackupQuote {
                    text: q.text.clone(),
                    position: q.position,
                })
                .collect(),
            timestamp: Utc::now(),
        }
    }
}
