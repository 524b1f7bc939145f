/// Business logic layer for notes-service
///
/// - NoteService: upload, gated reads, listings, search
/// - ModerationService: report ledger, visibility transitions, worklist
/// - EngagementService: votes, bookmarks, downloads
/// - AdminService: role management and audit reads
/// - UserService: profile mirror of the auth provider
pub mod admin;
pub mod engagement;
pub mod moderation;
pub mod notes;
pub mod users;

pub use admin::AdminService;
pub use engagement::EngagementService;
pub use moderation::ModerationService;
pub use notes::NoteService;
pub use users::{RegisterInput, UserService};
