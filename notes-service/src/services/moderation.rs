/// Moderation workflow: report ledger, visibility transitions, admin
/// worklist.
///
/// Callers are identified explicitly: every method takes the acting user's
/// loaded profile. Role checks happen here, before any write, so a denied
/// call has no side effects at all.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{audit_repo, note_repo, report_repo};
use crate::error::{AppError, Result};
use crate::middleware::require_admin;
use crate::models::{
    AdminAction, NoteStatus, Report, ReportAction, ReportFilter, ReportReason, ReportStatus,
    ResolveAction, SubmitReportOutcome, UserProfile, REPORT_DETAILS_MAX,
};

pub struct ModerationService {
    pool: PgPool,
}

impl ModerationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a report against a note.
    ///
    /// Validation happens before any write; the write itself is the single
    /// conditional statement in the report repository, so either the ledger
    /// row, the counter, the reporter set and the optional auto-hide all
    /// land, or none of them do.
    pub async fn submit_report(
        &self,
        reporter: &UserProfile,
        note_id: Uuid,
        reason: &str,
        details: &str,
    ) -> Result<SubmitReportOutcome> {
        let reason = ReportReason::parse(reason)
            .ok_or_else(|| AppError::InvalidReason(reason.to_string()))?;

        if details.chars().count() > REPORT_DETAILS_MAX {
            return Err(AppError::DetailsTooLong {
                max: REPORT_DETAILS_MAX,
            });
        }

        let note = note_repo::find_note(&self.pool, note_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        if note.status == NoteStatus::Deleted {
            return Err(AppError::NotFound(format!("Note {note_id} not found")));
        }

        if note.owner_id == reporter.id {
            return Err(AppError::PermissionDenied(
                "you cannot report your own note".to_string(),
            ));
        }

        let outcome =
            report_repo::submit_report(&self.pool, note_id, reporter, reason, details).await?;

        if outcome.auto_hidden {
            tracing::warn!(
                note_id = %note_id,
                report_count = outcome.report_count,
                "Note auto-hidden pending admin review"
            );
        }

        Ok(outcome)
    }

    /// Admin worklist over the report ledger. Most recent first; each call
    /// is a fresh snapshot, so a report shown as pending may already be
    /// resolved by the time the admin acts (that resolve then fails with
    /// `NotPending`).
    pub async fn list_reports(
        &self,
        caller: &UserProfile,
        filter: ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>> {
        require_admin(caller)?;
        report_repo::list_reports(&self.pool, filter, limit, offset).await
    }

    /// Count of pending reports (worklist badge).
    pub async fn count_pending_reports(&self, caller: &UserProfile) -> Result<i64> {
        require_admin(caller)?;
        report_repo::count_pending(&self.pool).await
    }

    /// Restore a hidden note: active again, ledger state cleared, audited.
    pub async fn restore_note(&self, caller: &UserProfile, note_id: Uuid) -> Result<()> {
        require_admin(caller)?;

        let mut tx = self.pool.begin().await?;

        let title = match note_repo::restore_note(&mut tx, note_id).await? {
            Some(title) => title,
            None => {
                // Distinguish a missing note from one that simply is not
                // hidden.
                return match note_repo::find_note(&self.pool, note_id).await? {
                    Some(_) => Err(AppError::NotHidden(note_id.to_string())),
                    None => Err(AppError::NotFound(format!("Note {note_id} not found"))),
                };
            }
        };

        audit_repo::append(
            &mut tx,
            &AdminAction::RestoreNote { note_id },
            caller,
            &title,
            "note restored",
        )
        .await?;

        tx.commit().await?;

        tracing::info!(note_id = %note_id, admin = %caller.id, "Note restored");

        Ok(())
    }

    /// Soft-delete a note, bulk-resolve its pending reports, and audit.
    /// Deleted is terminal; a second delete finds nothing.
    pub async fn delete_note(
        &self,
        caller: &UserProfile,
        note_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        require_admin(caller)?;

        let mut tx = self.pool.begin().await?;

        let title = note_repo::soft_delete_note(&mut tx, note_id, caller.id, reason)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))?;

        let resolved = report_repo::resolve_all_for_note(&mut tx, note_id, caller).await?;

        audit_repo::append(
            &mut tx,
            &AdminAction::DeleteNote {
                note_id,
                reason: reason.to_string(),
            },
            caller,
            &title,
            reason,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            note_id = %note_id,
            admin = %caller.id,
            resolved_reports = resolved,
            "Note deleted"
        );

        Ok(())
    }

    /// Resolve a pending report.
    ///
    /// `delete` and `restore` dispatch to the note transitions above;
    /// `dismiss` touches only the report itself.
    pub async fn resolve_report(
        &self,
        caller: &UserProfile,
        report_id: Uuid,
        action: ResolveAction,
        reason: Option<&str>,
    ) -> Result<Report> {
        require_admin(caller)?;

        let report = report_repo::get_report(&self.pool, report_id).await?;

        match action {
            ResolveAction::Delete => {
                let reason = reason
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Reported: {}", report.reason));

                let mut tx = self.pool.begin().await?;

                // Guard on this report first so a racing resolution
                // surfaces as NotPending instead of a double delete.
                report_repo::review_report(
                    &mut tx,
                    report_id,
                    caller,
                    ReportStatus::Resolved,
                    ReportAction::Deleted,
                )
                .await?;

                let title =
                    note_repo::soft_delete_note(&mut tx, report.note_id, caller.id, &reason)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Note {} not found", report.note_id))
                        })?;

                // Close out every other pending report on the same note.
                report_repo::resolve_all_for_note(&mut tx, report.note_id, caller).await?;

                audit_repo::append(
                    &mut tx,
                    &AdminAction::DeleteNote {
                        note_id: report.note_id,
                        reason: reason.clone(),
                    },
                    caller,
                    &title,
                    &reason,
                )
                .await?;

                tx.commit().await?;
            }
            ResolveAction::Restore => {
                let mut tx = self.pool.begin().await?;

                let reviewed = report_repo::review_report(
                    &mut tx,
                    report_id,
                    caller,
                    ReportStatus::Reviewed,
                    ReportAction::Restored,
                )
                .await?;

                let title = match note_repo::restore_note(&mut tx, report.note_id).await? {
                    Some(title) => title,
                    None => {
                        return match note_repo::find_note(&self.pool, report.note_id).await? {
                            Some(_) => Err(AppError::NotHidden(report.note_id.to_string())),
                            None => Err(AppError::NotFound(format!(
                                "Note {} not found",
                                report.note_id
                            ))),
                        };
                    }
                };

                audit_repo::append(
                    &mut tx,
                    &AdminAction::RestoreNote {
                        note_id: report.note_id,
                    },
                    caller,
                    &title,
                    "false report - note restored",
                )
                .await?;

                tx.commit().await?;

                return Ok(reviewed);
            }
            ResolveAction::Dismiss => {
                let mut tx = self.pool.begin().await?;

                let reviewed = report_repo::review_report(
                    &mut tx,
                    report_id,
                    caller,
                    ReportStatus::Reviewed,
                    ReportAction::Dismissed,
                )
                .await?;

                audit_repo::append(
                    &mut tx,
                    &AdminAction::DismissReport {
                        report_id,
                        note_id: report.note_id,
                    },
                    caller,
                    &report.note_title,
                    "report dismissed",
                )
                .await?;

                tx.commit().await?;

                return Ok(reviewed);
            }
        }

        report_repo::get_report(&self.pool, report_id).await
    }
}
