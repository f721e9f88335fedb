use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectorService;
use crate::models::schools::CreateTermRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, load_term, require_school};

pub async fn create_term(
    service: &DirectorService,
    request: &HttpRequest,
    term: CreateTermRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;

    if term.name.trim().is_empty() || term.academic_year.trim().is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Term name and academic year are required",
        )
        .into());
    }
    if term.end_date <= term.start_date {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "end_date must be after start_date",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let created = storage.create_term(school_id, term).await?;
    info!("Term {} created for school {}", created.id, school_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Term created successfully")))
}

pub async fn list_terms(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let terms = storage.list_terms(school_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(terms, "Terms retrieved")))
}

/// 激活学期，同校只保留一个活动学期
pub async fn activate_term(
    service: &DirectorService,
    request: &HttpRequest,
    term_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let term = load_term(&storage, school_id, term_id).await?;

    storage.activate_term(school_id, term.id).await?;
    info!("Term {} activated for school {}", term.id, school_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Term activated")))
}
