use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use crate::models::users::{UpdateUserRequest, UserListParams, UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::utils::validate::{normalize_phone, validate_name, validate_phone};

pub async fn list_users(
    service: &AdminService,
    request: &HttpRequest,
    params: UserListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let users = storage.list_users_with_pagination(params.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users, "Users retrieved")))
}

pub async fn get_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_user_by_id(user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse::from(user),
            "User retrieved",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}

pub async fn update_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
    mut update: UpdateUserRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    for name in [&update.first_name, &update.last_name].into_iter().flatten() {
        validate_name(name)
            .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    if let Some(phone) = update.phone.take() {
        validate_phone(&phone)
            .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
        update.phone = Some(normalize_phone(&phone));
    }
    if let Some(school_id) = update.school_id
        && storage.get_school_by_id(school_id).await?.is_none()
    {
        return Err(ApiError::not_found(ErrorCode::SchoolNotFound, "School not found").into());
    }
    if let Some(roles) = update.secondary_roles.as_mut() {
        roles.sort_by_key(|r| r.as_str());
        roles.dedup();
    }

    match storage.update_user(user_id, update).await? {
        Some(user) => {
            info!("User {} updated by admin", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse::from(user),
                "User updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}

pub async fn delete_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    if current.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CannotDeleteSelf,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request)?;
    if storage.delete_user(user_id).await? {
        info!("User {} deleted by {}", user_id, current.id);
        Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("User deleted successfully")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )))
    }
}
