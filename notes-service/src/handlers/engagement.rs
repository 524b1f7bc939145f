/// Engagement handlers - votes, bookmarks, downloads.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::{load_caller, PaginationParams};
use crate::middleware::AuthUser;
use crate::models::VoteType;
use crate::services::EngagementService;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: VoteType,
}

/// Cast, switch, or retract a vote (voting the same way twice retracts).
pub async fn vote_note(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let state = service.vote(&caller, *note_id, req.vote_type).await?;

    Ok(HttpResponse::Ok().json(state))
}

/// The caller's current vote on a note (used to paint the vote buttons).
pub async fn get_my_vote(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let vote = service.current_vote(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "vote": vote })))
}

/// Toggle a bookmark.
pub async fn toggle_bookmark(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let bookmarked = service.toggle_bookmark(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "bookmarked": bookmarked })))
}

/// Whether the caller has bookmarked this note.
pub async fn get_bookmark_status(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let bookmarked = service.is_bookmarked(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "bookmarked": bookmarked })))
}

/// Record a download and return the hosted file URL.
pub async fn download_note(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let file_url = service.record_download(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "file_url": file_url })))
}

pub async fn my_bookmarks(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let notes = service
        .my_bookmarks(&caller, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}

pub async fn my_downloads(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = EngagementService::new((**pool).clone());

    let notes = service
        .my_downloads(&caller, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}
