use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use crate::models::schools::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::ApiError;
use crate::utils::validate::validate_email;

pub async fn create_school(
    service: &AdminService,
    request: &HttpRequest,
    mut school: CreateSchoolRequest,
) -> ActixResult<HttpResponse> {
    school.name = school.name.trim().to_string();
    if school.name.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "School name is required").into());
    }
    if let Some(email) = &school.email {
        validate_email(email).map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    // 沙盒学校只能由启动流程创建
    school.is_sandbox = false;

    let storage = service.get_storage(request)?;
    if let Some(director_id) = school.director_id {
        ensure_director(&storage, director_id).await?;
    }

    let created = storage.create_school(school).await?;
    info!("School {} created: {}", created.id, created.name);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "School created successfully")))
}

pub async fn list_schools(
    service: &AdminService,
    request: &HttpRequest,
    params: SchoolListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let schools = storage.list_schools_with_pagination(params.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(schools, "Schools retrieved")))
}

pub async fn get_school(
    service: &AdminService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let school = storage
        .get_school_by_id(school_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SchoolNotFound, "School not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School retrieved")))
}

pub async fn update_school(
    service: &AdminService,
    request: &HttpRequest,
    school_id: i64,
    update: UpdateSchoolRequest,
) -> ActixResult<HttpResponse> {
    if let Some(email) = &update.email {
        validate_email(email).map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    let storage = service.get_storage(request)?;
    if let Some(director_id) = update.director_id {
        ensure_director(&storage, director_id).await?;
    }

    let school = storage
        .update_school(school_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SchoolNotFound, "School not found"))?;
    info!("School {} updated", school.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School updated successfully")))
}

pub async fn delete_school(
    service: &AdminService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if !storage.delete_school(school_id).await? {
        return Err(ApiError::not_found(ErrorCode::SchoolNotFound, "School not found").into());
    }
    info!("School {} deleted", school_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("School deleted successfully")))
}

// 指定的校长账户必须具备 Director 角色
async fn ensure_director(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    director_id: i64,
) -> ActixResult<()> {
    match storage.get_user_by_id(director_id).await? {
        Some(user) if user.has_role(UserRole::Director) => Ok(()),
        Some(_) => Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Assigned director must have the director role",
        )
        .into()),
        None => Err(ApiError::not_found(ErrorCode::UserNotFound, "Director not found").into()),
    }
}
