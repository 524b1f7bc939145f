/// Profile handlers - registration mirror, profile reads and updates,
/// platform stats.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::handlers::load_caller;
use crate::middleware::AuthUser;
use crate::services::{RegisterInput, UserService};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 20))]
    pub college_usn: Option<String>,
    pub department: Option<String>,
    pub year: Option<i16>,
    /// "student" or "professor"; admin roles are never self-assigned.
    pub role: String,
}

/// Create or refresh the caller's profile after auth-provider sign-up.
pub async fn register_profile(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let req = req.into_inner();

    let profile = service
        .register(
            &auth,
            RegisterInput {
                name: req.name,
                college_usn: req.college_usn,
                department: req.department,
                year: req.year,
                role: req.role,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(profile))
}

pub async fn get_my_profile(pool: web::Data<PgPool>, auth: AuthUser) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;

    Ok(HttpResponse::Ok().json(caller))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub department: Option<String>,
    pub year: Option<i16>,
}

pub async fn update_my_profile(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let caller = load_caller(&pool, &auth).await?;
    let service = UserService::new((**pool).clone());

    let updated = service
        .update_profile(
            &caller,
            req.name.as_deref(),
            req.department.as_deref(),
            req.year,
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Public profile view.
pub async fn get_user_profile(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = UserService::new((**pool).clone());
    let profile = service.get_profile(*user_id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Dashboard counters.
pub async fn get_platform_stats(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = UserService::new((**pool).clone());
    let stats = service.platform_stats().await?;

    Ok(HttpResponse::Ok().json(stats))
}
