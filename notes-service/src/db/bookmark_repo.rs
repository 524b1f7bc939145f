use crate::error::Result;
use crate::models::{Bookmark, Note};
use sqlx::PgPool;
use uuid::Uuid;

/// Toggle a bookmark. Returns true when the note ended up bookmarked.
pub async fn toggle_bookmark(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> Result<bool> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO bookmarks (note_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (note_id, user_id) DO NOTHING
        "#,
    )
    .bind(note_id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        return Ok(true);
    }

    sqlx::query("DELETE FROM bookmarks WHERE note_id = $1 AND user_id = $2")
        .bind(note_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(false)
}

/// Check if a user has bookmarked a note.
pub async fn find_bookmark(
    pool: &PgPool,
    note_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Bookmark>> {
    let bookmark = sqlx::query_as::<_, Bookmark>(
        "SELECT * FROM bookmarks WHERE note_id = $1 AND user_id = $2",
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(bookmark)
}

/// The notes a user has bookmarked, newest bookmark first. Deleted notes
/// drop out of the listing.
pub async fn list_user_bookmarks(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT n.* FROM notes n
        JOIN bookmarks b ON b.note_id = n.id
        WHERE b.user_id = $1 AND n.status <> 'deleted'
        ORDER BY b.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}
