use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::GeolocationService;
use super::access::load_device;
use super::geofence;
use crate::models::geolocation::{
    AlertSeverity, AlertType, DevicePositionUpdate, DeviceStatusResponse, LocationAlert,
    LocationUpdateRequest, LocationUpdateResponse, NewLocationAlert, PanicRequest, TrackedDevice,
    ZoneFilter, ZoneStatusView,
};
use crate::models::notifications::NotificationKind;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};
use crate::services::system::DynamicConfig;
use crate::storage::Storage;

fn device_zones_filter(device: &TrackedDevice) -> ZoneFilter {
    ZoneFilter {
        device_ids: vec![device.id],
        school_id: device.school_id,
        active_only: true,
    }
}

fn new_alert(
    device: &TrackedDevice,
    alert_type: AlertType,
    zone_id: Option<i64>,
    message: String,
    latitude: f64,
    longitude: f64,
) -> NewLocationAlert {
    NewLocationAlert {
        device_id: device.id,
        student_id: device.student_id,
        zone_id,
        alert_type,
        severity: alert_type.default_severity(),
        message,
        latitude,
        longitude,
    }
}

/// 保存告警并通知学生家长；严重告警忽略通知偏好
async fn raise_alerts(
    storage: &Arc<dyn Storage>,
    device: &TrackedDevice,
    pending: Vec<NewLocationAlert>,
) -> Result<Vec<LocationAlert>, ApiError> {
    let dispatcher = NotificationDispatcher::from_config(storage.clone());
    let mut raised = Vec::with_capacity(pending.len());
    for alert in pending {
        let alert = storage.create_alert(alert).await?;
        let policy = if alert.severity == AlertSeverity::Critical {
            DeliveryPolicy::Urgent
        } else {
            DeliveryPolicy::Preferences
        };
        let notice = Notice::new(
            NotificationKind::Geolocation,
            format!("{} alert: {}", alert.alert_type, device.device_name),
            alert.message.clone(),
        )
        .with_reference(alert.id);
        dispatcher
            .notify_parents_of(device.student_id, &notice, &policy)
            .await;
        raised.push(alert);
    }
    Ok(raised)
}

fn validate_report(update: &LocationUpdateRequest) -> Result<(), ApiError> {
    geofence::validate_coordinates(update.latitude, update.longitude)
        .map_err(|msg| ApiError::bad_request(ErrorCode::InvalidCoordinates, msg))?;
    if update.speed.is_some_and(|s| !s.is_finite() || s < 0.0) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "speed must be a positive number",
        ));
    }
    if update.battery_level.is_some_and(|b| !(0..=100).contains(&b)) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "battery_level must be between 0 and 100",
        ));
    }
    Ok(())
}

/// 更新设备位置并评估所有生效区域；进出告警只在状态变化时产生，
/// 非允许时段停留每次停留告警一次
pub async fn report_location(
    service: &GeolocationService,
    request: &HttpRequest,
    update: LocationUpdateRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    validate_report(&update)?;

    let storage = service.get_storage(request)?;
    let device = load_device(&storage, &user, update.device_id).await?;
    if !device.is_active {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Device is inactive").into());
    }
    let (lat, lng) = (update.latitude, update.longitude);

    let zones = storage.list_zones(device_zones_filter(&device)).await?;
    let previous: HashMap<i64, (bool, bool)> = storage
        .list_zone_statuses(device.id)
        .await?
        .into_iter()
        .map(|s| (s.zone_id, (s.is_inside, s.schedule_alerted)))
        .collect();

    let now = chrono::Local::now();
    let mut pending = Vec::new();
    let mut views = Vec::with_capacity(zones.len());
    for zone in &zones {
        let (inside, distance) = geofence::evaluate(zone, lat, lng);
        let stored = previous.get(&zone.id).copied();
        let before = stored.map(|(was_inside, _)| was_inside);
        let was_alerted = stored.is_some_and(|(_, alerted)| alerted);

        if let Some(alert_type) = geofence::transition_alert(zone, before, inside) {
            let verb = if inside { "entered" } else { "left" };
            pending.push(new_alert(
                &device,
                alert_type,
                Some(zone.id),
                format!("{} {} {}", device.device_name, verb, zone.name),
                lat,
                lng,
            ));
        }
        let (overstay, schedule_alerted) =
            geofence::schedule_check(inside, geofence::is_allowed_at(zone, &now), was_alerted);
        if overstay {
            pending.push(new_alert(
                &device,
                AlertType::UnauthorizedTime,
                Some(zone.id),
                format!(
                    "{} is in {} outside the allowed schedule",
                    device.device_name, zone.name
                ),
                lat,
                lng,
            ));
        }
        if stored != Some((inside, schedule_alerted)) {
            storage
                .upsert_zone_status(device.id, zone.id, inside, schedule_alerted)
                .await?;
        }

        views.push(ZoneStatusView {
            zone_id: zone.id,
            zone_name: zone.name.clone(),
            is_inside: inside,
            distance_m: distance.round(),
        });
    }

    // 超速只在越过阈值时告警
    let speed_limit = DynamicConfig::speed_limit_kmh().await;
    if let Some(speed) = update.speed
        && speed > speed_limit
        && device.last_speed_kmh.is_none_or(|s| s <= speed_limit)
    {
        pending.push(new_alert(
            &device,
            AlertType::SpeedLimit,
            None,
            format!(
                "{} is moving at {:.0} km/h (limit {:.0} km/h)",
                device.device_name, speed, speed_limit
            ),
            lat,
            lng,
        ));
    }

    let threshold = DynamicConfig::low_battery_threshold().await;
    let (battery_alert, low_battery_alerted) =
        geofence::low_battery_check(update.battery_level, threshold, device.low_battery_alerted);
    if battery_alert {
        pending.push(new_alert(
            &device,
            AlertType::LowBattery,
            None,
            format!(
                "{} battery is low ({}%)",
                device.device_name,
                update.battery_level.unwrap_or_default()
            ),
            lat,
            lng,
        ));
    }

    let device = storage
        .update_device_position(
            device.id,
            DevicePositionUpdate {
                latitude: lat,
                longitude: lng,
                speed_kmh: update.speed,
                battery_level: update.battery_level,
                low_battery_alerted,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::DeviceNotFound, "Device not found"))?;

    let alerts = raise_alerts(&storage, &device, pending).await?;
    if !alerts.is_empty() {
        info!(
            "{} alert(s) raised for device {}",
            alerts.len(),
            device.id
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LocationUpdateResponse {
            device,
            zones: views,
            alerts,
        },
        "Location recorded",
    )))
}

pub async fn device_status(
    service: &GeolocationService,
    request: &HttpRequest,
    device_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let device = load_device(&storage, &user, device_id).await?;

    // 尚未上报位置时没有区域状态
    let zones = match device.last_latitude.zip(device.last_longitude) {
        Some((lat, lng)) => storage
            .list_zones(device_zones_filter(&device))
            .await?
            .iter()
            .map(|zone| {
                let (is_inside, distance) = geofence::evaluate(zone, lat, lng);
                ZoneStatusView {
                    zone_id: zone.id,
                    zone_name: zone.name.clone(),
                    is_inside,
                    distance_m: distance.round(),
                }
            })
            .collect(),
        None => Vec::new(),
    };
    let unresolved_alerts = storage.count_unresolved_alerts(device.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DeviceStatusResponse {
            device,
            zones,
            unresolved_alerts,
        },
        "Device status retrieved",
    )))
}

/// 紧急求助：生成严重告警并立即通知
pub async fn panic(
    service: &GeolocationService,
    request: &HttpRequest,
    panic: PanicRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    geofence::validate_coordinates(panic.latitude, panic.longitude)
        .map_err(|msg| ApiError::bad_request(ErrorCode::InvalidCoordinates, msg))?;

    let storage = service.get_storage(request)?;
    let device = load_device(&storage, &user, panic.device_id).await?;

    let mut message = format!("PANIC ({}) from {}", panic.panic_type.trim(), device.device_name);
    if let Some(extra) = panic.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        message.push_str(": ");
        message.push_str(extra);
    }

    let alert = new_alert(
        &device,
        AlertType::Panic,
        None,
        message,
        panic.latitude,
        panic.longitude,
    );
    let mut raised = raise_alerts(&storage, &device, vec![alert]).await?;
    let Some(alert) = raised.pop() else {
        return Err(ApiError::new(
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to raise panic alert",
        )
        .into());
    };

    warn!(
        "Panic alert {} raised for device {} by {}",
        alert.id, device.id, user.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(alert, "Panic alert raised")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(lat: f64, speed: Option<f64>, battery: Option<i32>) -> LocationUpdateRequest {
        LocationUpdateRequest {
            device_id: 1,
            latitude: lat,
            longitude: 11.5,
            accuracy: None,
            speed,
            battery_level: battery,
        }
    }

    #[test]
    fn test_report_validation() {
        assert!(validate_report(&report(3.8, Some(30.0), Some(50))).is_ok());
        assert!(validate_report(&report(95.0, None, None)).is_err());
        assert!(validate_report(&report(3.8, Some(-1.0), None)).is_err());
        assert!(validate_report(&report(3.8, None, Some(101))).is_err());
    }
}
