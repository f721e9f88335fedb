use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DirectorService;
use crate::models::schools::UpdateSchoolRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, require_school};
use crate::utils::validate::validate_email;

pub async fn school_profile(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let school = storage
        .get_school_by_id(school_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SchoolNotFound, "School not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School profile retrieved")))
}

pub async fn update_school_profile(
    service: &DirectorService,
    request: &HttpRequest,
    mut update: UpdateSchoolRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;

    if let Some(email) = &update.email {
        validate_email(email).map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    // 订阅与校长任命由平台管理员维护
    if !user.is_platform_admin() {
        update.subscription_plan = None;
        update.subscription_status = None;
        update.director_id = None;
    }

    let storage = service.get_storage(request)?;
    let school = storage
        .update_school(school_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SchoolNotFound, "School not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School profile updated")))
}
