/// Authorization checks for notes-service
///
/// Role and ownership gates over an explicitly loaded caller profile. Every
/// admin operation runs one of these before touching state, so a denied
/// caller leaves nothing behind, not even an audit entry.
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Note, UserProfile};

/// Require an admin or super_admin caller.
pub fn require_admin(caller: &UserProfile) -> Result<()> {
    if caller.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "admin access required".to_string(),
        ))
    }
}

/// Require a super_admin caller (role management).
pub fn require_super_admin(caller: &UserProfile) -> Result<()> {
    if caller.role.can_manage_admins() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "super admin access required".to_string(),
        ))
    }
}

/// Check that a user owns a note before modifying it.
pub fn check_note_ownership(user_id: Uuid, note: &Note) -> Result<()> {
    if note.owner_id == user_id {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "you don't have permission to modify this note".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Utc;

    fn profile_with_role(role: UserRole) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.edu".to_string(),
            college_usn: None,
            department: None,
            year: None,
            role,
            upload_count: 0,
            download_count: 0,
            upvotes_received: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_gate() {
        assert!(require_admin(&profile_with_role(UserRole::Admin)).is_ok());
        assert!(require_admin(&profile_with_role(UserRole::SuperAdmin)).is_ok());
        assert!(matches!(
            require_admin(&profile_with_role(UserRole::Student)),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            require_admin(&profile_with_role(UserRole::Professor)),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_super_admin_gate() {
        assert!(require_super_admin(&profile_with_role(UserRole::SuperAdmin)).is_ok());
        assert!(matches!(
            require_super_admin(&profile_with_role(UserRole::Admin)),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
