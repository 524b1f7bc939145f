/// Engagement service - votes, bookmarks, downloads.
///
/// Every operation re-checks visibility: hidden notes accept no engagement
/// from regular users, deleted notes from nobody.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{bookmark_repo, download_repo, note_repo, vote_repo};
use crate::error::{AppError, Result};
use crate::models::{Note, NoteStatus, UserProfile, VoteState, VoteType};

pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gate an engagement action on the note's visibility for this caller.
    async fn interactable_note(&self, caller: &UserProfile, note_id: Uuid) -> Result<Note> {
        let note = note_repo::find_note(&self.pool, note_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        match note.status {
            NoteStatus::Deleted => Err(AppError::NotFound(format!("Note {note_id} not found"))),
            NoteStatus::Hidden if !caller.role.is_admin() => Err(AppError::PermissionDenied(
                "this file is hidden pending admin review".to_string(),
            )),
            _ => Ok(note),
        }
    }

    /// Toggle or switch the caller's vote.
    pub async fn vote(
        &self,
        caller: &UserProfile,
        note_id: Uuid,
        vote_type: VoteType,
    ) -> Result<VoteState> {
        self.interactable_note(caller, note_id).await?;

        let state = vote_repo::apply_vote(&self.pool, note_id, caller.id, vote_type).await?;

        tracing::debug!(
            note_id = %note_id,
            user = %caller.id,
            vote = ?state.vote,
            "Vote applied"
        );

        Ok(state)
    }

    /// The caller's current vote on a note.
    pub async fn current_vote(
        &self,
        caller: &UserProfile,
        note_id: Uuid,
    ) -> Result<Option<VoteType>> {
        vote_repo::find_vote(&self.pool, note_id, caller.id).await
    }

    /// Toggle a bookmark. Returns whether the note is now bookmarked.
    pub async fn toggle_bookmark(&self, caller: &UserProfile, note_id: Uuid) -> Result<bool> {
        self.interactable_note(caller, note_id).await?;
        bookmark_repo::toggle_bookmark(&self.pool, note_id, caller.id).await
    }

    pub async fn is_bookmarked(&self, caller: &UserProfile, note_id: Uuid) -> Result<bool> {
        Ok(bookmark_repo::find_bookmark(&self.pool, note_id, caller.id)
            .await?
            .is_some())
    }

    pub async fn my_bookmarks(
        &self,
        caller: &UserProfile,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        bookmark_repo::list_user_bookmarks(&self.pool, caller.id, limit, offset).await
    }

    /// Record a download and hand back the hosted file URL.
    pub async fn record_download(&self, caller: &UserProfile, note_id: Uuid) -> Result<String> {
        let note = self.interactable_note(caller, note_id).await?;

        download_repo::record_download(&self.pool, note_id, caller.id).await?;

        tracing::debug!(note_id = %note_id, user = %caller.id, "Download recorded");

        Ok(note.file_url)
    }

    pub async fn my_downloads(
        &self,
        caller: &UserProfile,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        download_repo::list_user_downloads(&self.pool, caller.id, limit, offset).await
    }
}
