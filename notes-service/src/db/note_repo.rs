use crate::models::{CreateNoteInput, Note, NoteSearch, NoteSort, NoteStatus};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Insert a new note. Runs inside the caller's transaction so the uploader's
/// counter moves with it.
pub async fn insert_note(
    conn: &mut PgConnection,
    owner_id: Uuid,
    uploader_name: &str,
    input: &CreateNoteInput,
) -> Result<Note, sqlx::Error> {
    let note = sqlx::query_as::<_, Note>(
        r#"
        INSERT INTO notes (
            owner_id, uploader_name, title, subject, department, semester,
            professor, description, tags, file_url, file_type, file_size
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(uploader_name)
    .bind(&input.title)
    .bind(&input.subject)
    .bind(&input.department)
    .bind(input.semester)
    .bind(&input.professor)
    .bind(&input.description)
    .bind(&input.tags)
    .bind(&input.file_url)
    .bind(&input.file_type)
    .bind(input.file_size)
    .fetch_one(conn)
    .await?;

    Ok(note)
}

/// Get a note by ID regardless of status. Visibility gating is the
/// service's job.
pub async fn find_note(pool: &PgPool, note_id: Uuid) -> Result<Option<Note>, sqlx::Error> {
    let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = $1")
        .bind(note_id)
        .fetch_optional(pool)
        .await?;

    Ok(note)
}

/// Bump the view counter. Atomic server-side increment; only active notes
/// accumulate views.
pub async fn increment_views(pool: &PgPool, note_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notes SET views = views + 1 WHERE id = $1 AND status = 'active'")
        .bind(note_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Most recently uploaded active notes.
pub async fn list_recent(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Note>, sqlx::Error> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT * FROM notes
        WHERE status = 'active'
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// Most upvoted active notes.
pub async fn list_top_upvoted(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>, sqlx::Error> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT * FROM notes
        WHERE status = 'active'
        ORDER BY upvotes DESC, created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// Active notes for one department, optionally narrowed to a semester.
pub async fn list_by_department(
    pool: &PgPool,
    department: &str,
    semester: Option<i16>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>, sqlx::Error> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT * FROM notes
        WHERE status = 'active'
          AND department = $1
          AND ($2::smallint IS NULL OR semester = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(department)
    .bind(semester)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// All of one user's uploads, every status included; owners see their own
/// hidden and deleted notes in "My Uploads".
pub async fn list_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>, sqlx::Error> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT * FROM notes
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// Admin worklist: notes in a given status, most recently touched first.
pub async fn list_by_status(
    pool: &PgPool,
    status: NoteStatus,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>, sqlx::Error> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT * FROM notes
        WHERE status = $1
        ORDER BY updated_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// Filtered search over active notes. The substring match runs server-side
/// with ILIKE over title/subject/description/professor/tags.
pub async fn search_notes(
    pool: &PgPool,
    search: &NoteSearch,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>, sqlx::Error> {
    let order_by = match search.sort.unwrap_or(NoteSort::Recent) {
        NoteSort::Recent => "created_at DESC",
        NoteSort::Upvoted => "upvotes DESC, created_at DESC",
        NoteSort::Downloaded => "downloads DESC, created_at DESC",
    };

    let pattern = search
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(|q| format!("%{}%", q.trim()));

    let sql = format!(
        r#"
        SELECT * FROM notes
        WHERE status = 'active'
          AND ($1::text IS NULL OR title ILIKE $1 OR subject ILIKE $1
               OR description ILIKE $1 OR professor ILIKE $1
               OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE $1))
          AND ($2::text IS NULL OR department = $2)
          AND ($3::smallint IS NULL OR semester = $3)
        ORDER BY {order_by}
        LIMIT $4 OFFSET $5
        "#
    );

    let notes = sqlx::query_as::<_, Note>(&sql)
        .bind(pattern)
        .bind(search.department.as_deref())
        .bind(search.semester)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(notes)
}

/// Restore a hidden note: back to active with the report ledger state
/// cleared. Returns the title, or `None` when the note is missing or not
/// hidden (the caller distinguishes the two).
pub async fn restore_note(
    conn: &mut PgConnection,
    note_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    let title: Option<String> = sqlx::query_scalar(
        r#"
        UPDATE notes
        SET status = 'active',
            report_count = 0,
            reported_by = ARRAY[]::uuid[],
            hidden_at = NULL,
            deleted_by = NULL,
            deleted_at = NULL,
            delete_reason = NULL,
            updated_at = NOW()
        WHERE id = $1 AND status = 'hidden'
        RETURNING title
        "#,
    )
    .bind(note_id)
    .fetch_optional(conn)
    .await?;

    Ok(title)
}

/// Soft-delete a note. Terminal: a deleted note never matches this guard
/// again. Returns the title, or `None` when absent or already deleted.
pub async fn soft_delete_note(
    conn: &mut PgConnection,
    note_id: Uuid,
    deleted_by: Uuid,
    reason: &str,
) -> Result<Option<String>, sqlx::Error> {
    let title: Option<String> = sqlx::query_scalar(
        r#"
        UPDATE notes
        SET status = 'deleted',
            deleted_by = $2,
            deleted_at = NOW(),
            delete_reason = $3,
            updated_at = NOW()
        WHERE id = $1 AND status <> 'deleted'
        RETURNING title
        "#,
    )
    .bind(note_id)
    .bind(deleted_by)
    .bind(reason)
    .fetch_optional(conn)
    .await?;

    Ok(title)
}

/// Count of all non-deleted notes (dashboard stats).
pub async fn count_notes(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE status <> 'deleted'")
        .fetch_one(pool)
        .await
}
