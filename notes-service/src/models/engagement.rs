use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::note::VoteType;

/// A user's bookmark on a note.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: Uuid,
    pub note_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Caller-visible result of a vote toggle.
#[derive(Debug, Clone, Serialize)]
pub struct VoteState {
    /// The caller's vote after the operation, if any.
    pub vote: Option<VoteType>,
    pub upvotes: i32,
    pub downvotes: i32,
}

/// Dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub total_notes: i64,
    pub total_users: i64,
    pub downloads_today: i64,
}
