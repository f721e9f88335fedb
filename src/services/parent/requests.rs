use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ParentService;
use crate::models::parent_requests::CreateParentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_parent_of};

pub async fn create_request(
    service: &ParentService,
    request: &HttpRequest,
    mut parent_request: CreateParentRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    parent_request.subject = parent_request.subject.trim().to_string();
    parent_request.description = parent_request.description.trim().to_string();
    if parent_request.subject.is_empty() || parent_request.description.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Subject and description are required",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    ensure_parent_of(&storage, user.id, parent_request.student_id).await?;

    // 申请归属学生所在学校
    let school_id = storage
        .get_user_by_id(parent_request.student_id)
        .await?
        .and_then(|s| s.school_id)
        .ok_or_else(|| {
            ApiError::bad_request(
                ErrorCode::NoSchoolAssigned,
                "The student is not attached to a school",
            )
        })?;

    let created = storage
        .create_parent_request(user.id, school_id, parent_request)
        .await?;
    info!(
        "Parent request {} created by {} for school {}",
        created.id, user.id, school_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Request submitted")))
}

pub async fn list_requests(
    service: &ParentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let requests = storage
        .list_parent_requests(None, Some(user.id), None)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests, "Requests retrieved")))
}
