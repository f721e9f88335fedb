use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DirectorService;
use crate::models::classes::CreateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_school_access, require_school};

const MIN_COEFFICIENT: f64 = 0.1;
const MAX_COEFFICIENT: f64 = 10.0;

pub async fn create_subject(
    service: &DirectorService,
    request: &HttpRequest,
    mut subject: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;

    if subject.name_fr.trim().is_empty()
        || subject.name_en.trim().is_empty()
        || subject.code.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Subject names and code are required",
        )
        .into());
    }
    if !(MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(&subject.coefficient) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Coefficient must be between 0.1 and 10",
        )
        .into());
    }
    subject.code = subject.code.trim().to_uppercase();
    subject.school_id = school_id;

    let storage = service.get_storage(request)?;
    let created = storage.create_subject(subject).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Subject created successfully")))
}

pub async fn list_subjects(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let subjects = storage.list_subjects(school_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "Subjects retrieved")))
}

pub async fn delete_subject(
    service: &DirectorService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let subject = storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubjectNotFound, "Subject not found"))?;
    ensure_school_access(&user, subject.school_id)?;

    storage.delete_subject(subject.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Subject deleted successfully")))
}
