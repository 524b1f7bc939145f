use crate::error::Result;
use crate::models::{VoteState, VoteType};
use sqlx::PgPool;
use uuid::Uuid;

/// Toggle or switch a user's vote on a note.
///
/// One transaction moves the vote row, the note's counters and the owner's
/// received-upvotes counter together. Counter math is always expressed as
/// `x = x + delta` so concurrent voters never lose updates.
pub async fn apply_vote(
    pool: &PgPool,
    note_id: Uuid,
    user_id: Uuid,
    vote_type: VoteType,
) -> Result<VoteState> {
    let mut tx = pool.begin().await?;

    // Lock this user's vote row (if any) so a double-click can't double
    // count.
    let existing: Option<VoteType> = sqlx::query_scalar(
        "SELECT vote_type FROM votes WHERE note_id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (up_delta, down_delta, new_vote): (i32, i32, Option<VoteType>) = match existing {
        None => {
            sqlx::query(
                "INSERT INTO votes (note_id, user_id, vote_type) VALUES ($1, $2, $3)",
            )
            .bind(note_id)
            .bind(user_id)
            .bind(vote_type)
            .execute(&mut *tx)
            .await?;

            match vote_type {
                VoteType::Upvote => (1, 0, Some(vote_type)),
                VoteType::Downvote => (0, 1, Some(vote_type)),
            }
        }
        Some(previous) if previous == vote_type => {
            // Same direction again: remove the vote.
            sqlx::query("DELETE FROM votes WHERE note_id = $1 AND user_id = $2")
                .bind(note_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            match vote_type {
                VoteType::Upvote => (-1, 0, None),
                VoteType::Downvote => (0, -1, None),
            }
        }
        Some(_) => {
            // Opposite direction: switch.
            sqlx::query(
                "UPDATE votes SET vote_type = $3 WHERE note_id = $1 AND user_id = $2",
            )
            .bind(note_id)
            .bind(user_id)
            .bind(vote_type)
            .execute(&mut *tx)
            .await?;

            match vote_type {
                VoteType::Upvote => (1, -1, Some(vote_type)),
                VoteType::Downvote => (-1, 1, Some(vote_type)),
            }
        }
    };

    let (upvotes, downvotes): (i32, i32) = sqlx::query_as(
        r#"
        UPDATE notes
        SET upvotes = upvotes + $2,
            downvotes = downvotes + $3
        WHERE id = $1
        RETURNING upvotes, downvotes
        "#,
    )
    .bind(note_id)
    .bind(up_delta)
    .bind(down_delta)
    .fetch_one(&mut *tx)
    .await?;

    if up_delta != 0 {
        sqlx::query(
            r#"
            UPDATE users
            SET upvotes_received = upvotes_received + $2
            WHERE id = (SELECT owner_id FROM notes WHERE id = $1)
            "#,
        )
        .bind(note_id)
        .bind(up_delta)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(VoteState {
        vote: new_vote,
        upvotes,
        downvotes,
    })
}

/// The caller's current vote on a note, if any.
pub async fn find_vote(
    pool: &PgPool,
    note_id: Uuid,
    user_id: Uuid,
) -> Result<Option<VoteType>> {
    let vote = sqlx::query_scalar(
        "SELECT vote_type FROM votes WHERE note_id = $1 AND user_id = $2",
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(vote)
}
