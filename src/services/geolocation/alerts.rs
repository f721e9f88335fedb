use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GeolocationService;
use super::access::{load_device, visible_devices};
use crate::models::geolocation::AlertListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};

pub async fn list_alerts(
    service: &GeolocationService,
    request: &HttpRequest,
    query: AlertListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let device_ids: Vec<i64> = visible_devices(&storage, &user)
        .await?
        .iter()
        .map(|d| d.id)
        .collect();
    let alerts = if device_ids.is_empty() {
        Vec::new()
    } else {
        storage
            .list_alerts(&device_ids, query.unresolved_only)
            .await?
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts, "Alerts retrieved")))
}

pub async fn resolve_alert(
    service: &GeolocationService,
    request: &HttpRequest,
    alert_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let not_found = || ApiError::not_found(ErrorCode::AlertNotFound, "Alert not found");
    let alert = storage
        .get_alert_by_id(alert_id)
        .await?
        .ok_or_else(not_found)?;
    load_device(&storage, &user, alert.device_id)
        .await
        .map_err(|_| not_found())?;

    if alert.is_resolved {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(alert, "Alert already resolved")));
    }
    let resolved = storage
        .resolve_alert(alert.id, user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resolved, "Alert resolved")))
}
