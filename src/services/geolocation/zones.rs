use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GeolocationService;
use super::access::{load_device, load_zone_for_update, visible_devices};
use super::geofence;
use crate::models::geolocation::{
    CreateSafeZoneRequest, SafeZone, UpdateSafeZoneRequest, ZoneFilter, ZoneListQuery,
};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_school_access};

fn invalid(msg: &'static str) -> ApiError {
    ApiError::bad_request(ErrorCode::InvalidCoordinates, msg)
}

pub async fn create_zone(
    service: &GeolocationService,
    request: &HttpRequest,
    mut zone: CreateSafeZoneRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    zone.name = zone.name.trim().to_string();
    if zone.name.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "name is required").into());
    }
    geofence::validate_coordinates(zone.latitude, zone.longitude).map_err(invalid)?;
    geofence::validate_radius(zone.radius_m).map_err(invalid)?;
    geofence::validate_schedule(
        zone.allowed_time_start.as_deref(),
        zone.allowed_time_end.as_deref(),
        &zone.allowed_days,
    )
    .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    match (zone.device_id, zone.school_id) {
        (Some(device_id), _) => {
            let device = load_device(&storage, &user, device_id).await?;
            zone.school_id = device.school_id;
        }
        (None, Some(school_id)) => {
            ensure_school_access(&user, school_id)?;
            if !UserRole::staff_roles().contains(&&user.active_role) {
                return Err(ApiError::forbidden(
                    ErrorCode::Forbidden,
                    "Only school staff can create school zones",
                )
                .into());
            }
        }
        (None, None) => {
            return Err(ApiError::bad_request(
                ErrorCode::ValidationFailed,
                "Either device_id or school_id is required",
            )
            .into());
        }
    }

    let created = storage.create_zone(user.id, zone).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Zone created")))
}

/// 指定设备时返回设备区域及其学校区域，否则返回可见设备与本校的区域
pub async fn list_zones(
    service: &GeolocationService,
    request: &HttpRequest,
    query: ZoneListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let filter = match query.device_id {
        Some(device_id) => {
            let device = load_device(&storage, &user, device_id).await?;
            ZoneFilter {
                device_ids: vec![device.id],
                school_id: device.school_id,
                active_only: false,
            }
        }
        None => ZoneFilter {
            device_ids: visible_devices(&storage, &user)
                .await?
                .iter()
                .map(|d| d.id)
                .collect(),
            school_id: user.school_id,
            active_only: false,
        },
    };

    // 空条件会匹配全部区域
    if filter.device_ids.is_empty() && filter.school_id.is_none() {
        return Ok(
            HttpResponse::Ok().json(ApiResponse::success(Vec::<SafeZone>::new(), "Zones retrieved")),
        );
    }

    let zones = storage.list_zones(filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(zones, "Zones retrieved")))
}

pub async fn update_zone(
    service: &GeolocationService,
    request: &HttpRequest,
    zone_id: i64,
    update: UpdateSafeZoneRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let zone = load_zone_for_update(&storage, &user, zone_id).await?;

    geofence::validate_coordinates(
        update.latitude.unwrap_or(zone.latitude),
        update.longitude.unwrap_or(zone.longitude),
    )
    .map_err(invalid)?;
    geofence::validate_radius(update.radius_m.unwrap_or(zone.radius_m)).map_err(invalid)?;
    let start = update
        .allowed_time_start
        .as_deref()
        .or(zone.allowed_time_start.as_deref());
    let end = update
        .allowed_time_end
        .as_deref()
        .or(zone.allowed_time_end.as_deref());
    let days = update.allowed_days.as_deref().unwrap_or(&zone.allowed_days);
    geofence::validate_schedule(start, end, days)
        .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;

    let updated = storage
        .update_zone(zone.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::ZoneNotFound, "Zone not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Zone updated")))
}

pub async fn delete_zone(
    service: &GeolocationService,
    request: &HttpRequest,
    zone_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let zone = load_zone_for_update(&storage, &user, zone_id).await?;

    storage.delete_zone(zone.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Zone deleted")))
}
