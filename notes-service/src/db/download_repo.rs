use crate::error::Result;
use crate::models::Note;
use sqlx::PgPool;
use uuid::Uuid;

/// Record a download: the event row, the note's counter and the user's
/// counter commit together.
pub async fn record_download(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO downloads (note_id, user_id) VALUES ($1, $2)")
        .bind(note_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE notes SET downloads = downloads + 1 WHERE id = $1")
        .bind(note_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE users SET download_count = download_count + 1 WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// The notes a user downloaded, most recent download first, deduplicated.
pub async fn list_user_downloads(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Note>> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT n.* FROM notes n
        JOIN (
            SELECT note_id, MAX(downloaded_at) AS last_download
            FROM downloads
            WHERE user_id = $1
            GROUP BY note_id
        ) d ON d.note_id = n.id
        WHERE n.status <> 'deleted'
        ORDER BY d.last_download DESC
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

/// Downloads recorded since local midnight UTC (dashboard stats).
pub async fn count_downloads_today(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM downloads WHERE downloaded_at >= date_trunc('day', NOW())",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
