/// Profile service - registration upsert and profile reads/updates.
///
/// Sign-up and sign-in live in the external auth provider; this service
/// only mirrors profiles and is the single place role strings become
/// canonical enum values.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{download_repo, note_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{PlatformStats, UserProfile, UserRole};

pub struct UserService {
    pool: PgPool,
}

pub struct RegisterInput {
    pub name: String,
    pub college_usn: Option<String>,
    pub department: Option<String>,
    pub year: Option<i16>,
    pub role: String,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create (or refresh) the caller's profile after the auth provider
    /// finishes sign-up. Role strings are normalized here, at write time;
    /// only student and professor can be self-assigned.
    pub async fn register(&self, auth: &AuthUser, input: RegisterInput) -> Result<UserProfile> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }

        let role = UserRole::parse(&input.role)
            .ok_or_else(|| AppError::Validation(format!("unknown role: {}", input.role)))?;

        if role.is_admin() {
            return Err(AppError::PermissionDenied(
                "admin roles are granted by a super admin, not at registration".to_string(),
            ));
        }

        let profile = user_repo::upsert_profile(
            &self.pool,
            &user_repo::UpsertProfileInput {
                id: auth.id,
                name: input.name.trim().to_string(),
                email: auth.email.trim().to_lowercase(),
                college_usn: input.college_usn,
                department: input.department,
                year: input.year,
                role,
            },
        )
        .await?;

        tracing::info!(user = %profile.id, role = %profile.role.as_str(), "Profile registered");

        Ok(profile)
    }

    /// Load the caller's profile; `Unauthorized` when the token is valid
    /// but registration never happened.
    pub async fn require_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        user_repo::find_profile(&self.pool, user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Public profile view.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        user_repo::find_profile(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    pub async fn update_profile(
        &self,
        caller: &UserProfile,
        name: Option<&str>,
        department: Option<&str>,
        year: Option<i16>,
    ) -> Result<UserProfile> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name cannot be empty".to_string()));
            }
        }

        user_repo::update_profile(&self.pool, caller.id, name, department, year).await
    }

    /// Dashboard counters.
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let total_notes = note_repo::count_notes(&self.pool).await?;
        let total_users = user_repo::count_users(&self.pool).await?;
        let downloads_today = download_repo::count_downloads_today(&self.pool).await?;

        Ok(PlatformStats {
            total_notes,
            total_users,
            downloads_today,
        })
    }
}
