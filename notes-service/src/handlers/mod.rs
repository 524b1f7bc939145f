/// HTTP handlers for notes-service
///
/// Handlers translate requests into explicit service calls: authenticate
/// via the extensions-provided `AuthUser`, load the caller's profile once,
/// and hand both to the service layer. No handler consults ambient state.
pub mod admin;
pub mod engagement;
pub mod notes;
pub mod reports;
pub mod users;

use serde::Deserialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UserProfile;
use crate::services::UserService;

// Re-export handler functions at module level
pub use admin::{
    delete_note_admin, demote_user, get_admin_logs, list_admins, list_notes_by_status,
    promote_user, restore_note_admin, search_user_by_email,
};
pub use engagement::{
    download_note, get_bookmark_status, get_my_vote, my_bookmarks, my_downloads, toggle_bookmark,
    vote_note,
};
pub use notes::{
    create_note, delete_own_note, get_note, get_department_notes, get_recent_notes,
    get_top_notes, get_user_notes, search_notes,
};
pub use reports::{list_reports, resolve_report, submit_report};
pub use users::{get_my_profile, get_platform_stats, get_user_profile, register_profile, update_my_profile};

/// Common pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to sane bounds; listings never return more than 100 rows.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Load the authenticated caller's profile. Every protected handler starts
/// here; a valid token without a registered profile is still unauthorized.
pub(crate) async fn load_caller(pool: &PgPool, auth: &AuthUser) -> Result<UserProfile> {
    UserService::new(pool.clone()).require_profile(auth.id).await
}
