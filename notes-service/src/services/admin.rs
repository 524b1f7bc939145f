/// Admin role management and audit log reads. Promotion and demotion are
/// super_admin-only; both refuse to touch a super_admin and demotion
/// refuses the caller themselves.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{audit_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::{require_admin, require_super_admin};
use crate::models::{AdminAction, AdminLog, UserProfile, UserRole};

pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant the admin role to a student or professor.
    pub async fn promote(&self, caller: &UserProfile, target_id: Uuid) -> Result<UserProfile> {
        require_super_admin(caller)?;

        let target = user_repo::find_profile(&self.pool, target_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {target_id} not found")))?;

        if target.role == UserRole::SuperAdmin {
            return Err(AppError::PermissionDenied(
                "cannot change a super admin's role".to_string(),
            ));
        }

        if target.role == UserRole::Admin {
            return Err(AppError::Conflict(format!(
                "{} is already an admin",
                target.name
            )));
        }

        let mut tx = self.pool.begin().await?;

        let updated = user_repo::set_role(&mut tx, target.id, UserRole::Admin).await?;

        audit_repo::append(
            &mut tx,
            &AdminAction::PromoteAdmin {
                target_user: target.id,
                previous_role: target.role,
            },
            caller,
            &target.name,
            "promoted to admin",
        )
        .await?;

        tx.commit().await?;

        tracing::info!(target = %target.id, admin = %caller.id, "User promoted to admin");

        Ok(updated)
    }

    /// Revoke the admin role. The user returns to the role they held before
    /// promotion (recovered from the promotion's audit entry), defaulting
    /// to student.
    pub async fn demote(&self, caller: &UserProfile, target_id: Uuid) -> Result<UserProfile> {
        require_super_admin(caller)?;

        if caller.id == target_id {
            return Err(AppError::PermissionDenied(
                "you cannot demote yourself".to_string(),
            ));
        }

        let target = user_repo::find_profile(&self.pool, target_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {target_id} not found")))?;

        if target.role == UserRole::SuperAdmin {
            return Err(AppError::PermissionDenied(
                "cannot demote a super admin".to_string(),
            ));
        }

        if !target.role.is_admin() {
            return Err(AppError::Conflict(format!(
                "{} is not an admin",
                target.name
            )));
        }

        let new_role = match audit_repo::last_promotion_previous_role(&self.pool, target.id).await?
        {
            Some(UserRole::Professor) => UserRole::Professor,
            _ => UserRole::Student,
        };

        let mut tx = self.pool.begin().await?;

        let updated = user_repo::set_role(&mut tx, target.id, new_role).await?;

        audit_repo::append(
            &mut tx,
            &AdminAction::DemoteAdmin {
                target_user: target.id,
                new_role,
            },
            caller,
            &target.name,
            "demoted from admin",
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            target = %target.id,
            admin = %caller.id,
            new_role = %new_role.as_str(),
            "Admin demoted"
        );

        Ok(updated)
    }

    /// Everyone currently holding admin rights.
    pub async fn list_admins(&self, caller: &UserProfile) -> Result<Vec<UserProfile>> {
        require_super_admin(caller)?;
        user_repo::list_admins(&self.pool).await
    }

    /// Look a user up by email for the manage-admins page.
    pub async fn find_user_by_email(
        &self,
        caller: &UserProfile,
        email: &str,
    ) -> Result<Option<UserProfile>> {
        require_super_admin(caller)?;
        user_repo::find_by_email(&self.pool, email.trim().to_lowercase().as_str()).await
    }

    /// Recent audit log entries.
    pub async fn recent_logs(
        &self,
        caller: &UserProfile,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminLog>> {
        require_admin(caller)?;
        audit_repo::list_recent(&self.pool, limit, offset).await
    }

    /// Audit history for one target id.
    pub async fn logs_for_target(
        &self,
        caller: &UserProfile,
        target_id: &str,
        limit: i64,
    ) -> Result<Vec<AdminLog>> {
        require_admin(caller)?;
        audit_repo::list_by_target(&self.pool, target_id, limit).await
    }
}
