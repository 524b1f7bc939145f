/// Note service - upload, visibility-gated reads, listings and search.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{note_repo, report_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::{check_note_ownership, require_admin};
use crate::models::{
    CreateNoteInput, Note, NoteSearch, NoteStatus, NoteView, UserProfile, ALLOWED_FILE_TYPES,
    DEPARTMENTS, MAX_FILE_SIZE, MAX_SEMESTER, MIN_SEMESTER, TAG_OPTIONS,
};

pub struct NoteService {
    pool: PgPool,
}

impl NoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upload a note. The file already lives on the hosting endpoint; this
    /// records its metadata and bumps the uploader's counter in the same
    /// transaction.
    pub async fn create_note(
        &self,
        owner: &UserProfile,
        input: CreateNoteInput,
    ) -> Result<Note> {
        validate_upload(&input)?;

        let mut tx = self.pool.begin().await?;

        let note = note_repo::insert_note(&mut tx, owner.id, &owner.name, &input).await?;
        user_repo::increment_upload_count(&mut tx, owner.id).await?;

        tx.commit().await?;

        tracing::info!(
            note_id = %note.id,
            owner = %owner.id,
            department = %note.department,
            semester = note.semester,
            "Note uploaded"
        );

        Ok(note)
    }

    /// Fetch a note as a given viewer sees it.
    ///
    /// Hidden notes come back redacted for non-admins (placeholder, no file
    /// URL); deleted notes are a 404 for everyone but admins. View counting
    /// only happens for active notes and never fails the read.
    pub async fn get_note(&self, viewer: &UserProfile, note_id: Uuid) -> Result<NoteView> {
        let note = note_repo::find_note(&self.pool, note_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        let is_admin = viewer.role.is_admin();
        let is_owner = note.owner_id == viewer.id;

        match note.status {
            NoteStatus::Deleted if !is_admin => {
                Err(AppError::NotFound(format!("Note {note_id} not found")))
            }
            NoteStatus::Hidden if !is_admin && !is_owner => Ok(NoteView {
                note: redact(note),
                redacted: true,
            }),
            NoteStatus::Active => {
                if let Err(err) = note_repo::increment_views(&self.pool, note_id).await {
                    tracing::debug!(%note_id, "view count update failed: {}", err);
                }
                Ok(NoteView {
                    note,
                    redacted: false,
                })
            }
            _ => Ok(NoteView {
                note,
                redacted: false,
            }),
        }
    }

    pub async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<Note>> {
        Ok(note_repo::list_recent(&self.pool, limit, offset).await?)
    }

    pub async fn list_top_upvoted(&self, limit: i64, offset: i64) -> Result<Vec<Note>> {
        Ok(note_repo::list_top_upvoted(&self.pool, limit, offset).await?)
    }

    pub async fn list_by_department(
        &self,
        department: &str,
        semester: Option<i16>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        Ok(note_repo::list_by_department(&self.pool, department, semester, limit, offset).await?)
    }

    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        Ok(note_repo::list_by_owner(&self.pool, owner_id, limit, offset).await?)
    }

    pub async fn search(
        &self,
        search: &NoteSearch,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        Ok(note_repo::search_notes(&self.pool, search, limit, offset).await?)
    }

    /// Admin review queue: notes by status (typically `hidden`).
    pub async fn admin_list_by_status(
        &self,
        caller: &UserProfile,
        status: NoteStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>> {
        require_admin(caller)?;
        Ok(note_repo::list_by_status(&self.pool, status, limit, offset).await?)
    }

    /// Owner takedown of their own upload. Soft delete, same terminal state
    /// as an admin delete, but no audit entry (not an admin action). Any
    /// pending reports are closed out so the worklist doesn't point at a
    /// dead note.
    pub async fn delete_own_note(&self, caller: &UserProfile, note_id: Uuid) -> Result<()> {
        let note = note_repo::find_note(&self.pool, note_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        check_note_ownership(caller.id, &note)?;

        if note.status == NoteStatus::Deleted {
            return Err(AppError::NotFound(format!("Note {note_id} not found")));
        }

        let mut tx = self.pool.begin().await?;

        note_repo::soft_delete_note(&mut tx, note_id, caller.id, "removed by uploader")
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        report_repo::resolve_all_for_note(&mut tx, note_id, caller).await?;

        tx.commit().await?;

        tracing::info!(note_id = %note_id, owner = %caller.id, "Note removed by uploader");

        Ok(())
    }
}

/// Redact the fields a hidden-note placeholder must not expose.
fn redact(mut note: Note) -> Note {
    note.file_url = String::new();
    note.reported_by = Vec::new();
    note
}

fn validate_upload(input: &CreateNoteInput) -> Result<()> {
    if input.title.trim().is_empty() || input.subject.trim().is_empty() {
        return Err(AppError::Validation(
            "title and subject are required".to_string(),
        ));
    }

    if !DEPARTMENTS.contains(&input.department.as_str()) {
        return Err(AppError::Validation(format!(
            "unknown department: {}",
            input.department
        )));
    }

    if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&input.semester) {
        return Err(AppError::Validation(format!(
            "semester must be between {MIN_SEMESTER} and {MAX_SEMESTER}"
        )));
    }

    if !ALLOWED_FILE_TYPES.contains(&input.file_type.as_str()) {
        return Err(AppError::Validation(format!(
            "unsupported file type: {}",
            input.file_type
        )));
    }

    if input.file_size <= 0 || input.file_size > MAX_FILE_SIZE {
        return Err(AppError::Validation(
            "file size must be positive and at most 50MB".to_string(),
        ));
    }

    for tag in &input.tags {
        if !TAG_OPTIONS.contains(&tag.as_str()) {
            return Err(AppError::Validation(format!("unknown tag: {tag}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateNoteInput {
        CreateNoteInput {
            title: "Operating Systems Unit 3".to_string(),
            subject: "Operating Systems".to_string(),
            department: "CSE".to_string(),
            semester: 5,
            professor: String::new(),
            description: String::new(),
            tags: vec!["Class Notes".to_string()],
            file_url: "https://files.example.com/os-unit3.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1024 * 1024,
        }
    }

    #[test]
    fn test_valid_upload_passes() {
        assert!(validate_upload(&valid_input()).is_ok());
    }

    #[test]
    fn test_unknown_department_rejected() {
        let mut input = valid_input();
        input.department = "BIO".to_string();
        assert!(matches!(
            validate_upload(&input),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_semester_bounds() {
        let mut input = valid_input();
        input.semester = 0;
        assert!(validate_upload(&input).is_err());
        input.semester = 9;
        assert!(validate_upload(&input).is_err());
        input.semester = 8;
        assert!(validate_upload(&input).is_ok());
    }

    #[test]
    fn test_file_constraints() {
        let mut input = valid_input();
        input.file_type = "application/zip".to_string();
        assert!(validate_upload(&input).is_err());

        let mut input = valid_input();
        input.file_size = MAX_FILE_SIZE + 1;
        assert!(validate_upload(&input).is_err());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut input = valid_input();
        input.tags.push("Memes".to_string());
        assert!(validate_upload(&input).is_err());
    }
}
