/// Report handlers - submission and the admin worklist.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::handlers::{load_caller, PaginationParams};
use crate::middleware::AuthUser;
use crate::models::{ReportFilter, ResolveAction};
use crate::services::ModerationService;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReportRequest {
    pub reason: String,
    #[validate(length(max = 300))]
    pub details: Option<String>,
}

/// Report a note. Reason must come from the fixed set; details are bounded.
pub async fn submit_report(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    note_id: web::Path<Uuid>,
    req: web::Json<SubmitReportRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let caller = load_caller(&pool, &auth).await?;
    let service = ModerationService::new((**pool).clone());

    let details = req.details.as_deref().unwrap_or("").trim();

    let outcome = service
        .submit_report(&caller, *note_id, &req.reason, details)
        .await?;

    Ok(HttpResponse::Created().json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin worklist: reports filtered by status, newest first.
pub async fn list_reports(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    query: web::Query<ReportListQuery>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = ModerationService::new((**pool).clone());

    let filter = match query.status.as_deref() {
        None => ReportFilter::Pending,
        Some(value) => ReportFilter::parse(value)
            .ok_or_else(|| AppError::Validation(format!("unknown report filter: {value}")))?,
    };

    let pagination = PaginationParams {
        limit: query.limit,
        offset: query.offset,
    };

    let reports = service
        .list_reports(&caller, filter, pagination.limit(), pagination.offset())
        .await?;

    Ok(HttpResponse::Ok().json(reports))
}

#[derive(Debug, Deserialize)]
pub struct ResolveReportRequest {
    pub action: ResolveAction,
    pub reason: Option<String>,
}

/// Resolve a pending report: delete or restore the note, or dismiss the
/// report outright.
pub async fn resolve_report(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    report_id: web::Path<Uuid>,
    req: web::Json<ResolveReportRequest>,
) -> Result<HttpResponse> {
    let caller = load_caller(&pool, &auth).await?;
    let service = ModerationService::new((**pool).clone());

    let report = service
        .resolve_report(&caller, *report_id, req.action, req.reason.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(report))
}
