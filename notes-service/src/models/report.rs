use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Distinct reports required before a note is auto-hidden.
pub const REPORT_THRESHOLD: i32 = 5;

/// Upper bound on the free-text details field.
pub const REPORT_DETAILS_MAX: usize = 300;

/// Fixed set of report reasons. Stored as their display strings so the
/// ledger reads the same way the client shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportReason {
    FakeContent,
    WrongSubject,
    Spam,
    Inappropriate,
    Duplicate,
    Other,
}

impl ReportReason {
    pub const ALL: &'static [ReportReason] = &[
        ReportReason::FakeContent,
        ReportReason::WrongSubject,
        ReportReason::Spam,
        ReportReason::Inappropriate,
        ReportReason::Duplicate,
        ReportReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::FakeContent => "Fake/Incorrect Content",
            ReportReason::WrongSubject => "Wrong Subject/Department",
            ReportReason::Spam => "Spam/Advertisement",
            ReportReason::Inappropriate => "Inappropriate Content",
            ReportReason::Duplicate => "Duplicate File",
            ReportReason::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.as_str() == value)
    }
}

/// Report lifecycle: pending until an admin acts on it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
        }
    }
}

/// What the reviewing admin did about the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    Deleted,
    Restored,
    Dismissed,
}

/// Admin worklist resolution choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    Delete,
    Restore,
    Dismiss,
}

/// Worklist filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFilter {
    #[default]
    Pending,
    Reviewed,
    All,
}

impl ReportFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReportFilter::Pending),
            "reviewed" => Some(ReportFilter::Reviewed),
            "all" => Some(ReportFilter::All),
            _ => None,
        }
    }
}

/// One user's complaint about one note. Never deleted; reviewed at most
/// once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub note_id: Uuid,
    pub note_title: String,
    pub reported_by: Uuid,
    pub reported_by_name: String,
    pub reported_by_usn: String,
    pub reason: String,
    pub details: String,
    pub status: ReportStatus,
    pub action: Option<ReportAction>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_by_name: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful report submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReportOutcome {
    pub report: Report,
    pub report_count: i32,
    pub auto_hidden: bool,
}
