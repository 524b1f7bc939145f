/// Note handlers - upload, reads, listings, search.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::handlers::{load_caller, PaginationParams};
use crate::middleware::AuthUser;
use crate::models::{CreateNoteInput, NoteSearch, NoteSort};
use crate::services::NoteService;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub department: String,
    pub semester: i16,
    #[validate(length(max = 100))]
    pub professor: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    #[validate(url)]
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
}

/// Upload a note (metadata; the file is already hosted).
pub async fn create_note(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    req: web::Json<CreateNoteRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let caller = load_caller(&pool, &auth).await?;
    let service = NoteService::new((**pool).clone());

    let req = req.into_inner();
    let note = service
        .create_note(
            &caller,
            CreateNoteInput {
                title: req.title,
                subject: req.subject,
                department: req.department,
                semester: req.semester,
                professor: req.professor.unwrap_or_default(),
                description: req.description.unwrap_or_default(),
                tags: req.tags.unwrap_or_default(),
                file_url: req.file_url,
                file_type: req.file_type,
                file_size: req.file_size,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(note))
}

/// Get a note as the caller is allowed to see it.
pub async fn get_note(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = NoteService::new((**pool).clone());

    let view = service.get_note(&caller, *note_id).await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Owner takedown.
pub async fn delete_own_note(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = NoteService::new((**pool).clone());

    service.delete_own_note(&caller, *note_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_recent_notes(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let service = NoteService::new((**pool).clone());
    let notes = service.list_recent(query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(notes))
}

pub async fn get_top_notes(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let service = NoteService::new((**pool).clone());
    let notes = service
        .list_top_upvoted(query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}

#[derive(Debug, Deserialize)]
pub struct DepartmentQuery {
    pub semester: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn get_department_notes(
    pool: web::Data<PgPool>,
    department: web::Path<String>,
    query: web::Query<DepartmentQuery>,
) -> Result<HttpResponse> {
    let service = NoteService::new((**pool).clone());
    let notes = service
        .list_by_department(
            &department,
            query.semester,
            query.limit.unwrap_or(20).clamp(1, 100),
            query.offset.unwrap_or(0).max(0),
        )
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}

pub async fn get_user_notes(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let service = NoteService::new((**pool).clone());
    let notes = service
        .list_by_owner(*user_id, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i16>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn search_notes(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let service = NoteService::new((**pool).clone());

    let search = NoteSearch {
        query: query.q.clone(),
        department: query.department.clone(),
        semester: query.semester,
        sort: query.sort.as_deref().and_then(NoteSort::parse),
    };

    let notes = service
        .search(
            &search,
            query.limit.unwrap_or(20).clamp(1, 100),
            query.offset.unwrap_or(0).max(0),
        )
        .await?;

    Ok(HttpResponse::Ok().json(notes))
}
