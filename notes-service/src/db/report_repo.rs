use crate::error::{AppError, Result};
use crate::models::{
    NoteStatus, Report, ReportAction, ReportFilter, ReportReason, ReportStatus,
    SubmitReportOutcome, UserProfile, REPORT_THRESHOLD,
};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Record a report: one conditional update moves the counter, the reporter
/// set and (at the threshold) the visibility together, then the ledger row
/// is inserted in the same transaction.
///
/// The `NOT (reporter = ANY(reported_by))` guard is what makes a concurrent
/// duplicate submission lose: the second statement sees the first's array
/// membership and matches zero rows. There is no read-modify-write anywhere
/// on this path.
pub async fn submit_report(
    pool: &PgPool,
    note_id: Uuid,
    reporter: &UserProfile,
    reason: ReportReason,
    details: &str,
) -> Result<SubmitReportOutcome> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, (i32, NoteStatus, String)>(
        r#"
        UPDATE notes
        SET report_count = report_count + 1,
            reported_by = array_append(reported_by, $2),
            status = CASE
                WHEN status = 'active' AND report_count + 1 >= $3 THEN 'hidden'::note_status
                ELSE status
            END,
            hidden_at = CASE
                WHEN status = 'active' AND report_count + 1 >= $3 THEN NOW()
                ELSE hidden_at
            END,
            updated_at = NOW()
        WHERE id = $1
          AND status <> 'deleted'
          AND NOT ($2 = ANY(reported_by))
        RETURNING report_count, status, title
        "#,
    )
    .bind(note_id)
    .bind(reporter.id)
    .bind(REPORT_THRESHOLD)
    .fetch_optional(&mut *tx)
    .await?;

    let (report_count, status, note_title) = match updated {
        Some(row) => row,
        None => {
            // Zero rows: missing, deleted, or already reported. Look once to
            // tell the caller which.
            let existing = sqlx::query_as::<_, (NoteStatus, Vec<Uuid>)>(
                "SELECT status, reported_by FROM notes WHERE id = $1",
            )
            .bind(note_id)
            .fetch_optional(&mut *tx)
            .await?;

            return Err(match existing {
                Some((status, _)) if status == NoteStatus::Deleted => {
                    AppError::NotFound(format!("Note {note_id} not found"))
                }
                Some((_, reported_by)) if reported_by.contains(&reporter.id) => {
                    AppError::AlreadyReported
                }
                Some(_) => AppError::Internal(format!(
                    "report update matched no rows for note {note_id}"
                )),
                None => AppError::NotFound(format!("Note {note_id} not found")),
            });
        }
    };

    let report = sqlx::query_as::<_, Report>(
        r#"
        INSERT INTO reports (
            note_id, note_title, reported_by, reported_by_name,
            reported_by_usn, reason, details
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(note_id)
    .bind(&note_title)
    .bind(reporter.id)
    .bind(&reporter.name)
    .bind(reporter.usn_or_default())
    .bind(reason.as_str())
    .bind(details)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    // The flip happens exactly when the counter lands on the threshold;
    // later reports find the note already hidden.
    let auto_hidden = status == NoteStatus::Hidden && report_count == REPORT_THRESHOLD;

    tracing::info!(
        report_id = %report.id,
        note_id = %note_id,
        reporter = %reporter.id,
        reason = %reason.as_str(),
        report_count,
        auto_hidden,
        "Report recorded"
    );

    Ok(SubmitReportOutcome {
        report,
        report_count,
        auto_hidden,
    })
}

/// Get a report by ID.
pub async fn get_report(pool: &PgPool, report_id: Uuid) -> Result<Report> {
    let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
        .bind(report_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {report_id} not found")))?;

    Ok(report)
}

/// Admin worklist: reports matching the filter, most recent first. Each call
/// reissues a fresh snapshot; callers tolerate racing resolutions.
pub async fn list_reports(
    pool: &PgPool,
    filter: ReportFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Report>> {
    let reports = match filter {
        ReportFilter::All => {
            sqlx::query_as::<_, Report>(
                r#"
                SELECT * FROM reports
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        ReportFilter::Pending | ReportFilter::Reviewed => {
            let status = match filter {
                ReportFilter::Pending => "pending",
                _ => "reviewed",
            };
            sqlx::query_as::<_, Report>(
                r#"
                SELECT * FROM reports
                WHERE status = $1::report_status
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(reports)
}

/// Review a pending report: set its final status, action and reviewer
/// fields in one guarded update. Fails with `NotPending` when the report
/// was already acted on (possibly by a racing admin).
pub async fn review_report(
    conn: &mut PgConnection,
    report_id: Uuid,
    reviewer: &UserProfile,
    status: ReportStatus,
    action: ReportAction,
) -> Result<Report> {
    let report = sqlx::query_as::<_, Report>(
        r#"
        UPDATE reports
        SET status = $2,
            action = $3,
            reviewed_by = $4,
            reviewed_by_name = $5,
            reviewed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(status)
    .bind(action)
    .bind(reviewer.id)
    .bind(&reviewer.name)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotPending(report_id.to_string()))?;

    Ok(report)
}

/// Bulk-resolve every pending report on a note as part of its deletion.
/// Returns how many reports were closed.
pub async fn resolve_all_for_note(
    conn: &mut PgConnection,
    note_id: Uuid,
    reviewer: &UserProfile,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE reports
        SET status = 'resolved',
            action = 'deleted',
            reviewed_by = $2,
            reviewed_by_name = $3,
            reviewed_at = NOW()
        WHERE note_id = $1 AND status = 'pending'
        "#,
    )
    .bind(note_id)
    .bind(reviewer.id)
    .bind(&reviewer.name)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Count pending reports (admin dashboard badge).
pub async fn count_pending(pool: &PgPool) -> Result<i64> {
    let count =
        sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    Ok(count)
}
