use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Departments offered in the upload form.
pub const DEPARTMENTS: &[&str] = &[
    "CSE", "ECE", "MECH", "CIVIL", "EEE", "AI/ML", "ISE", "DS", "RA",
];

/// Fixed tag vocabulary for uploads.
pub const TAG_OPTIONS: &[&str] = &[
    "Exam Prep",
    "Assignment",
    "Class Notes",
    "Lab Manual",
    "Previous Year Papers",
];

/// MIME types accepted for hosted files.
pub const ALLOWED_FILE_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

/// 50 MB upload ceiling, matching the file-hosting collaborator's limit.
pub const MAX_FILE_SIZE: i64 = 50 * 1024 * 1024;

pub const MIN_SEMESTER: i16 = 1;
pub const MAX_SEMESTER: i16 = 8;

/// Note visibility state machine.
///
/// active -> hidden is automatic (report threshold), hidden -> active is an
/// admin restore, deleted is terminal and reachable from both live states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "note_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Active,
    Hidden,
    Deleted,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Active => "active",
            NoteStatus::Hidden => "hidden",
            NoteStatus::Deleted => "deleted",
        }
    }

    pub fn can_transition_to(&self, next: NoteStatus) -> bool {
        matches!(
            (self, next),
            (NoteStatus::Active, NoteStatus::Hidden)
                | (NoteStatus::Hidden, NoteStatus::Active)
                | (NoteStatus::Active, NoteStatus::Deleted)
                | (NoteStatus::Hidden, NoteStatus::Deleted)
        )
    }
}

/// Vote direction on a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vote_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

/// Sort orders for browse/search listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSort {
    Recent,
    Upvoted,
    Downloaded,
}

impl NoteSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "recent" => Some(NoteSort::Recent),
            "upvoted" => Some(NoteSort::Upvoted),
            "downloaded" => Some(NoteSort::Downloaded),
            _ => None,
        }
    }
}

/// A shared study-material record.
///
/// `report_count` always equals `reported_by.len()`; both are only moved by
/// the single conditional update in the report repository.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub uploader_name: String,
    pub title: String,
    pub subject: String,
    pub department: String,
    pub semester: i16,
    pub professor: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub status: NoteStatus,
    pub report_count: i32,
    pub reported_by: Vec<Uuid>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub downloads: i32,
    pub views: i32,
    pub hidden_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub delete_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a note. The file itself already lives on
/// the external hosting endpoint; only its metadata arrives here.
#[derive(Debug, Clone)]
pub struct CreateNoteInput {
    pub title: String,
    pub subject: String,
    pub department: String,
    pub semester: i16,
    pub professor: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
}

/// A note as a given viewer is allowed to see it. `redacted` means the
/// viewer gets the hidden-file placeholder: no file URL, no engagement
/// actions.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub note: Note,
    pub redacted: bool,
}

/// Search parameters for the notes listing.
#[derive(Debug, Clone, Default)]
pub struct NoteSearch {
    pub query: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i16>,
    pub sort: Option<NoteSort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(NoteStatus::Active.can_transition_to(NoteStatus::Hidden));
        assert!(NoteStatus::Hidden.can_transition_to(NoteStatus::Active));
        assert!(NoteStatus::Active.can_transition_to(NoteStatus::Deleted));
        assert!(NoteStatus::Hidden.can_transition_to(NoteStatus::Deleted));

        // deleted is terminal
        assert!(!NoteStatus::Deleted.can_transition_to(NoteStatus::Active));
        assert!(!NoteStatus::Deleted.can_transition_to(NoteStatus::Hidden));

        // no direct unhide path besides restore
        assert!(!NoteStatus::Active.can_transition_to(NoteStatus::Active));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(NoteSort::parse("recent"), Some(NoteSort::Recent));
        assert_eq!(NoteSort::parse("upvoted"), Some(NoteSort::Upvoted));
        assert_eq!(NoteSort::parse("downloaded"), Some(NoteSort::Downloaded));
        assert_eq!(NoteSort::parse("views"), None);
    }
}
