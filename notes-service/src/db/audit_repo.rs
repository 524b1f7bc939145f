use crate::error::{AppError, Result};
use crate::models::{AdminAction, AdminLog, UserProfile, UserRole};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Append an audit entry. Always called inside the transaction of the
/// state change it records, so a transition and its log entry commit or
/// roll back together. The log is append-only; nothing in the service
/// updates or deletes rows here.
pub async fn append(
    conn: &mut PgConnection,
    action: &AdminAction,
    performed_by: &UserProfile,
    target_name: &str,
    reason: &str,
) -> Result<AdminLog> {
    let details = serde_json::to_value(action)
        .map_err(|e| AppError::Internal(format!("audit payload serialization failed: {e}")))?;

    let log = sqlx::query_as::<_, AdminLog>(
        r#"
        INSERT INTO admin_logs (
            action_type, performed_by, performed_by_name,
            target_id, target_name, reason, details
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(action.action_type())
    .bind(performed_by.id)
    .bind(&performed_by.name)
    .bind(action.target_id())
    .bind(target_name)
    .bind(reason)
    .bind(details)
    .fetch_one(conn)
    .await?;

    tracing::info!(
        action = %log.action_type,
        admin = %performed_by.id,
        target = %log.target_id,
        "Admin action logged"
    );

    Ok(log)
}

/// Most recent audit entries.
pub async fn list_recent(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<AdminLog>> {
    let logs = sqlx::query_as::<_, AdminLog>(
        "SELECT * FROM admin_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Audit entries for one target (note, report or user id).
pub async fn list_by_target(pool: &PgPool, target_id: &str, limit: i64) -> Result<Vec<AdminLog>> {
    let logs = sqlx::query_as::<_, AdminLog>(
        r#"
        SELECT * FROM admin_logs
        WHERE target_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(target_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// The role a user held before their most recent promotion, recovered from
/// the promotion's audit payload. Used to demote professors back to
/// professor instead of student.
pub async fn last_promotion_previous_role(
    pool: &PgPool,
    target_user: Uuid,
) -> Result<Option<UserRole>> {
    let details: Option<serde_json::Value> = sqlx::query_scalar(
        r#"
        SELECT details FROM admin_logs
        WHERE action_type = 'promote_admin' AND target_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(target_user.to_string())
    .fetch_optional(pool)
    .await?;

    let role = details
        .and_then(|d| d.get("previous_role").cloned())
        .and_then(|v| serde_json::from_value::<UserRole>(v).ok());

    Ok(role)
}
