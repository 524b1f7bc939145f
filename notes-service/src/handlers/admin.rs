/// Admin handlers - moderation actions on notes, role management, audit
/// log reads. Role checks live in the services; these handlers only load
/// the caller and dispatch.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::handlers::{load_caller, PaginationParams};
use crate::middleware::AuthUser;
use crate::models::NoteStatus;
use crate::services::{AdminService, ModerationService, NoteService};

/// Restore a hidden note.
pub async fn restore_note_admin(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = ModerationService::new((**pool).clone());

    service.restore_note(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "active" })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteNoteRequest {
    #[validate(length(min = 1, max = 300))]
    pub reason: String,
}

/// Delete a note. Destructive and unrecoverable from the client's point of
/// view; the UI confirms before calling.
pub async fn delete_note_admin(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
    req: web::Json<DeleteNoteRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let caller = load_caller(&pool, &auth).await?;
    let service = ModerationService::new((**pool).clone());

    service.delete_note(&caller, *note_id, &req.reason).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct NoteStatusQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Review queue: notes by status (defaults to hidden).
pub async fn list_notes_by_status(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<NoteStatusQuery>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = NoteService::new((**pool).clone());

    let status = match query.status.as_deref() {
        None | Some("hidden") => NoteStatus::Hidden,
        Some("active") => NoteStatus::Active,
        Some("deleted") => NoteStatus::Deleted,
        Some(other) => {
            return Err(AppError::Validation(format!(
                "unknown note status: {other}"
            )))
        }
    };

    let pagination = PaginationParams {
        limit: query.limit,
        offset: query.offset,
    };

    let notes = service
        .admin_list_by_status(&caller, status, pagination.limit(), pagination.offset())
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}

/// Recent audit log entries.
pub async fn get_admin_logs(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = AdminService::new((**pool).clone());

    let logs = service
        .recent_logs(&caller, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(logs))
}

/// Everyone holding admin rights (super_admin only).
pub async fn list_admins(pool: web::Data<PgPool>, auth: AuthUser) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = AdminService::new((**pool).clone());

    let admins = service.list_admins(&caller).await?;

    Ok(HttpResponse::Ok().json(admins))
}

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub email: String,
}

/// Find a user by email for the manage-admins page (super_admin only).
pub async fn search_user_by_email(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<UserSearchQuery>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = AdminService::new((**pool).clone());

    match service.find_user_by_email(&caller, &query.email).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": { "code": "NOT_FOUND", "message": "No user with that email" }
        }))),
    }
}

/// Promote a user to admin (super_admin only).
pub async fn promote_user(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = AdminService::new((**pool).clone());

    let updated = service.promote(&caller, *user_id).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Demote an admin (super_admin only, never self, never a super_admin).
pub async fn demote_user(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = AdminService::new((**pool).clone());

    let updated = service.demote(&caller, *user_id).await?;

    Ok(HttpResponse::Ok().json(updated))
}
