use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GeolocationService;
use super::access::{can_access_student, load_device, visible_devices};
use crate::models::geolocation::RegisterDeviceRequest;
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};

/// 由关联家长或学生所在学校的教职员工登记
pub async fn register_device(
    service: &GeolocationService,
    request: &HttpRequest,
    mut device: RegisterDeviceRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    device.device_name = device.device_name.trim().to_string();
    if device.device_name.is_empty() {
        return Err(
            ApiError::bad_request(ErrorCode::ValidationFailed, "device_name is required").into(),
        );
    }

    let storage = service.get_storage(request)?;
    let student = storage
        .get_user_by_id(device.student_id)
        .await?
        .filter(|u| u.has_role(UserRole::Student))
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound, "Student not found"))?;

    if user.id == student.id
        || !can_access_student(&storage, &user, student.id, student.school_id).await?
    {
        return Err(ApiError::forbidden(
            ErrorCode::NotLinkedToStudent,
            "You cannot register a device for this student",
        )
        .into());
    }

    let created = storage
        .create_device(user.id, student.school_id, device)
        .await?;
    info!(
        "Device {} registered for student {} by {}",
        created.id, created.student_id, user.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Device registered")))
}

pub async fn list_devices(
    service: &GeolocationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let devices = visible_devices(&storage, &user).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(devices, "Devices retrieved")))
}

pub async fn delete_device(
    service: &GeolocationService,
    request: &HttpRequest,
    device_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let device = load_device(&storage, &user, device_id).await?;

    storage.delete_device(device.id).await?;
    info!("Device {} deleted by {}", device.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Device deleted")))
}
