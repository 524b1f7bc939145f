/// Data models for notes-service
///
/// - Note: shared study material with its visibility state machine
/// - Report: the moderation ledger entry
/// - AdminAction / AdminLog: the append-only audit trail
/// - UserProfile / UserRole: profiles mirrored from the auth provider
pub mod audit;
pub mod engagement;
pub mod note;
pub mod report;
pub mod user;

pub use audit::{AdminAction, AdminLog};
pub use engagement::{Bookmark, PlatformStats, VoteState};
pub use note::{
    CreateNoteInput, Note, NoteSearch, NoteSort, NoteStatus, NoteView, VoteType,
    ALLOWED_FILE_TYPES, DEPARTMENTS, MAX_FILE_SIZE, MAX_SEMESTER, MIN_SEMESTER, TAG_OPTIONS,
};
pub use report::{
    Report, ReportAction, ReportFilter, ReportReason, ReportStatus, ResolveAction,
    SubmitReportOutcome, REPORT_DETAILS_MAX, REPORT_THRESHOLD,
};
pub use user::{UserProfile, UserRole};
