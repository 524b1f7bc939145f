//! Integration tests: moderation workflow
//!
//! Exercises the report ledger and visibility controller against a real
//! database:
//! - duplicate reports from one user are rejected with the counter unmoved
//! - the counter and the reporter set always move together
//! - the fifth distinct report (and only the fifth) auto-hides a note
//! - restore resets ledger state and writes exactly one audit entry
//! - delete cascades to pending reports and writes exactly one audit entry
//! - every admin operation refuses student/professor callers untouched
//! - worklist resolution: delete / restore / dismiss, and the NotPending race

mod common;

use common::{
    count_audit_entries, create_test_note, create_test_user, report_ledger_state, setup_test_db,
};
use notes_service::error::AppError;
use notes_service::models::{
    NoteStatus, ReportFilter, ReportStatus, ResolveAction, UserRole, REPORT_THRESHOLD,
};
use notes_service::services::{ModerationService, NoteService};
use serial_test::serial;

const SPAM: &str = "Spam/Advertisement";

#[tokio::test]
#[serial]
async fn duplicate_report_is_rejected_and_counts_once() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let reporter = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    let outcome = moderation
        .submit_report(&reporter, note.id, "Other", "x")
        .await
        .expect("first report should succeed");
    assert_eq!(outcome.report_count, 1);
    assert!(!outcome.auto_hidden);

    // Same (note, reporter) again
    let err = moderation
        .submit_report(&reporter, note.id, "Other", "x")
        .await
        .expect_err("second report must fail");
    assert!(matches!(err, AppError::AlreadyReported));

    let (count, set_size, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(count, 1);
    assert_eq!(set_size, 1);
    assert_eq!(status, "active");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE note_id = $1")
        .bind(note.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1, "exactly one ledger row for the pair");
}

#[tokio::test]
#[serial]
async fn counter_always_equals_reporter_set_size() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    for _ in 0..3 {
        let reporter = create_test_user(&pool, UserRole::Student).await;
        moderation
            .submit_report(&reporter, note.id, SPAM, "")
            .await
            .expect("report should succeed");

        let (count, set_size, _) = report_ledger_state(&pool, note.id).await;
        assert_eq!(count as i64, set_size);
    }
}

#[tokio::test]
#[serial]
async fn fifth_distinct_report_hides_the_note() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    for i in 1..=REPORT_THRESHOLD {
        let reporter = create_test_user(&pool, UserRole::Student).await;
        let outcome = moderation
            .submit_report(&reporter, note.id, SPAM, "")
            .await
            .expect("report should succeed");

        assert_eq!(outcome.report_count, i);

        let (_, _, status) = report_ledger_state(&pool, note.id).await;
        if i < REPORT_THRESHOLD {
            assert_eq!(status, "active", "report {i} must not hide the note");
            assert!(!outcome.auto_hidden);
        } else {
            assert_eq!(status, "hidden", "report {i} must hide the note");
            assert!(outcome.auto_hidden);
        }
    }

    // A sixth report on the already-hidden note is still recorded; re-hiding
    // is a no-op.
    let late_reporter = create_test_user(&pool, UserRole::Student).await;
    let outcome = moderation
        .submit_report(&late_reporter, note.id, SPAM, "")
        .await
        .expect("report on hidden note is recorded");
    assert_eq!(outcome.report_count, REPORT_THRESHOLD + 1);
    assert!(!outcome.auto_hidden);
}

#[tokio::test]
#[serial]
async fn restore_resets_ledger_state_and_audits() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let note = create_test_note(&pool, &owner).await;

    for _ in 0..REPORT_THRESHOLD {
        let reporter = create_test_user(&pool, UserRole::Student).await;
        moderation
            .submit_report(&reporter, note.id, SPAM, "")
            .await
            .unwrap();
    }

    let (_, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "hidden");

    moderation
        .restore_note(&admin, note.id)
        .await
        .expect("restore should succeed");

    let (count, set_size, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "active");
    assert_eq!(count, 0);
    assert_eq!(set_size, 0);
    assert_eq!(count_audit_entries(&pool, "restore_note").await, 1);

    // Restoring a note that is not hidden is a precondition failure.
    let err = moderation
        .restore_note(&admin, note.id)
        .await
        .expect_err("second restore must fail");
    assert!(matches!(err, AppError::NotHidden(_)));

    // And the ledger accepts reports again after the reset.
    let reporter = create_test_user(&pool, UserRole::Student).await;
    let outcome = moderation
        .submit_report(&reporter, note.id, SPAM, "")
        .await
        .unwrap();
    assert_eq!(outcome.report_count, 1);
}

#[tokio::test]
#[serial]
async fn delete_cascades_to_pending_reports_and_audits() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());
    let notes = NoteService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    for _ in 0..2 {
        let reporter = create_test_user(&pool, UserRole::Student).await;
        moderation
            .submit_report(&reporter, note.id, "Inappropriate Content", "")
            .await
            .unwrap();
    }

    moderation
        .delete_note(&admin, note.id, "violates guidelines")
        .await
        .expect("delete should succeed");

    let (_, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "deleted");
    assert_eq!(count_audit_entries(&pool, "delete_note").await, 1);

    let open: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reports WHERE note_id = $1 AND status = 'pending'",
    )
    .bind(note.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open, 0, "no pending reports may survive a delete");

    let resolved: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reports WHERE note_id = $1 AND status = 'resolved' AND action = 'deleted'",
    )
    .bind(note.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(resolved, 2);

    // Deleted is terminal and unreachable for regular users.
    let err = notes
        .get_note(&student, note.id)
        .await
        .expect_err("deleted note must 404 for non-admins");
    assert!(matches!(err, AppError::NotFound(_)));

    let view = notes
        .get_note(&admin, note.id)
        .await
        .expect("admins still see deleted notes");
    assert_eq!(view.note.status, NoteStatus::Deleted);

    // Deleting again finds nothing to delete.
    let err = moderation
        .delete_note(&admin, note.id, "again")
        .await
        .expect_err("double delete must fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn admin_operations_refuse_non_admin_callers() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let professor = create_test_user(&pool, UserRole::Professor).await;
    let note = create_test_note(&pool, &owner).await;

    for caller in [&student, &professor] {
        let err = moderation
            .restore_note(caller, note.id)
            .await
            .expect_err("restore must be admin-only");
        assert!(matches!(err, AppError::PermissionDenied(_)));

        let err = moderation
            .delete_note(caller, note.id, "nope")
            .await
            .expect_err("delete must be admin-only");
        assert!(matches!(err, AppError::PermissionDenied(_)));

        let err = moderation
            .list_reports(caller, ReportFilter::Pending, 20, 0)
            .await
            .expect_err("worklist must be admin-only");
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    // Nothing changed while being refused.
    let (count, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!((count, status.as_str()), (0, "active"));
    assert_eq!(count_audit_entries(&pool, "delete_note").await, 0);
    assert_eq!(count_audit_entries(&pool, "restore_note").await, 0);
}

#[tokio::test]
#[serial]
async fn owner_cannot_report_own_note() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    let err = moderation
        .submit_report(&owner, note.id, "Other", "")
        .await
        .expect_err("self-report must fail");
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let (count, _, _) = report_ledger_state(&pool, note.id).await;
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
async fn report_validation_happens_before_any_write() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let reporter = create_test_user(&pool, UserRole::Student).await;
    let note = create_test_note(&pool, &owner).await;

    let err = moderation
        .submit_report(&reporter, note.id, "spam", "")
        .await
        .expect_err("unknown reason must fail");
    assert!(matches!(err, AppError::InvalidReason(_)));

    let err = moderation
        .submit_report(&reporter, note.id, "Other", &"x".repeat(301))
        .await
        .expect_err("oversized details must fail");
    assert!(matches!(err, AppError::DetailsTooLong { .. }));

    let (count, set_size, _) = report_ledger_state(&pool, note.id).await;
    assert_eq!((count, set_size), (0, 0));
}

#[tokio::test]
#[serial]
async fn worklist_resolution_dismiss_restore_delete() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let note = create_test_note(&pool, &owner).await;

    // -- dismiss: the note is untouched
    let reporter = create_test_user(&pool, UserRole::Student).await;
    let outcome = moderation
        .submit_report(&reporter, note.id, "Duplicate File", "")
        .await
        .unwrap();

    let resolved = moderation
        .resolve_report(&admin, outcome.report.id, ResolveAction::Dismiss, None)
        .await
        .expect("dismiss should succeed");
    assert_eq!(resolved.status, ReportStatus::Reviewed);
    assert_eq!(resolved.reviewed_by, Some(admin.id));
    assert_eq!(count_audit_entries(&pool, "dismiss_report").await, 1);

    let (count, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "active");
    assert_eq!(count, 1, "dismiss leaves the ledger state alone");

    // Resolving the same report again races into NotPending.
    let err = moderation
        .resolve_report(&admin, outcome.report.id, ResolveAction::Dismiss, None)
        .await
        .expect_err("second resolution must fail");
    assert!(matches!(err, AppError::NotPending(_)));

    // -- restore: hide the note first, then resolve a fresh report
    for _ in 0..REPORT_THRESHOLD {
        let r = create_test_user(&pool, UserRole::Student).await;
        moderation
            .submit_report(&r, note.id, SPAM, "")
            .await
            .unwrap();
    }
    let (_, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "hidden");

    let pending = moderation
        .list_reports(&admin, ReportFilter::Pending, 20, 0)
        .await
        .unwrap();
    let target = pending.first().expect("a pending report exists");

    let resolved = moderation
        .resolve_report(&admin, target.id, ResolveAction::Restore, None)
        .await
        .expect("restore resolution should succeed");
    assert_eq!(resolved.status, ReportStatus::Reviewed);

    let (count, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "active");
    assert_eq!(count, 0);

    // -- delete: report again, resolve with delete, everything pending closes
    let reporter = create_test_user(&pool, UserRole::Student).await;
    let outcome = moderation
        .submit_report(&reporter, note.id, "Fake/Incorrect Content", "all wrong")
        .await
        .unwrap();

    let resolved = moderation
        .resolve_report(&admin, outcome.report.id, ResolveAction::Delete, None)
        .await
        .expect("delete resolution should succeed");
    assert_eq!(resolved.status, ReportStatus::Resolved);

    let (_, _, status) = report_ledger_state(&pool, note.id).await;
    assert_eq!(status, "deleted");

    let open: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reports WHERE note_id = $1 AND status = 'pending'",
    )
    .bind(note.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open, 0);
}

#[tokio::test]
#[serial]
async fn worklist_filters_and_orders_newest_first() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;

    let first = create_test_note(&pool, &owner).await;
    let second = create_test_note(&pool, &owner).await;

    let r1 = create_test_user(&pool, UserRole::Student).await;
    let r2 = create_test_user(&pool, UserRole::Student).await;
    moderation
        .submit_report(&r1, first.id, "Other", "")
        .await
        .unwrap();
    let later = moderation
        .submit_report(&r2, second.id, "Other", "")
        .await
        .unwrap();

    let pending = moderation
        .list_reports(&admin, ReportFilter::Pending, 20, 0)
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, later.report.id, "most recent first");

    moderation
        .resolve_report(&admin, later.report.id, ResolveAction::Dismiss, None)
        .await
        .unwrap();

    let pending = moderation
        .list_reports(&admin, ReportFilter::Pending, 20, 0)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let reviewed = moderation
        .list_reports(&admin, ReportFilter::Reviewed, 20, 0)
        .await
        .unwrap();
    assert_eq!(reviewed.len(), 1);

    let all = moderation
        .list_reports(&admin, ReportFilter::All, 20, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[serial]
async fn hidden_notes_are_placeholders_for_regular_users() {
    let pool = setup_test_db().await.expect("test db");
    let moderation = ModerationService::new(pool.clone());
    let notes = NoteService::new(pool.clone());

    let owner = create_test_user(&pool, UserRole::Student).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let note = create_test_note(&pool, &owner).await;

    for _ in 0..REPORT_THRESHOLD {
        let r = create_test_user(&pool, UserRole::Student).await;
        moderation
            .submit_report(&r, note.id, SPAM, "")
            .await
            .unwrap();
    }

    let view = notes.get_note(&student, note.id).await.unwrap();
    assert!(view.redacted);
    assert!(view.note.file_url.is_empty(), "no content URL on placeholder");
    assert_eq!(view.note.status, NoteStatus::Hidden);

    let view = notes.get_note(&admin, note.id).await.unwrap();
    assert!(!view.redacted, "admins see hidden notes in full");
    assert!(!view.note.file_url.is_empty());
}
