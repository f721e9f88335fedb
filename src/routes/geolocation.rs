use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::geolocation::{
    AlertListQuery, CreateSafeZoneRequest, LocationUpdateRequest, PanicRequest,
    RegisterDeviceRequest, UpdateSafeZoneRequest, ZoneListQuery,
};
use crate::services::GeolocationService;
use crate::utils::{SafeAlertId, SafeDeviceId, SafeZoneId};

static GEOLOCATION_SERVICE: Lazy<GeolocationService> = Lazy::new(GeolocationService::new_lazy);

pub async fn register_device(
    req: HttpRequest,
    body: web::Json<RegisterDeviceRequest>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE
        .register_device(&req, body.into_inner())
        .await
}

pub async fn list_devices(req: HttpRequest) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.list_devices(&req).await
}

pub async fn delete_device(req: HttpRequest, path: SafeDeviceId) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.delete_device(&req, path.0).await
}

pub async fn device_status(req: HttpRequest, path: SafeDeviceId) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.device_status(&req, path.0).await
}

pub async fn create_zone(
    req: HttpRequest,
    body: web::Json<CreateSafeZoneRequest>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.create_zone(&req, body.into_inner()).await
}

pub async fn list_zones(
    req: HttpRequest,
    query: web::Query<ZoneListQuery>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.list_zones(&req, query.into_inner()).await
}

pub async fn update_zone(
    req: HttpRequest,
    path: SafeZoneId,
    body: web::Json<UpdateSafeZoneRequest>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE
        .update_zone(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_zone(req: HttpRequest, path: SafeZoneId) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.delete_zone(&req, path.0).await
}

pub async fn report_location(
    req: HttpRequest,
    body: web::Json<LocationUpdateRequest>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE
        .report_location(&req, body.into_inner())
        .await
}

pub async fn panic(req: HttpRequest, body: web::Json<PanicRequest>) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.panic(&req, body.into_inner()).await
}

pub async fn list_alerts(
    req: HttpRequest,
    query: web::Query<AlertListQuery>,
) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.list_alerts(&req, query.into_inner()).await
}

pub async fn resolve_alert(req: HttpRequest, path: SafeAlertId) -> ActixResult<HttpResponse> {
    GEOLOCATION_SERVICE.resolve_alert(&req, path.0).await
}

// 配置路由；设备与学生的关系在业务层检查
pub fn configure_geolocation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/geolocation")
            .wrap(RequireJWT)
            .service(
                web::resource("/devices")
                    .route(web::get().to(list_devices))
                    .route(web::post().to(register_device)),
            )
            .route("/devices/{device_id}", web::delete().to(delete_device))
            .route("/devices/{device_id}/status", web::get().to(device_status))
            .service(
                web::resource("/zones")
                    .route(web::get().to(list_zones))
                    .route(web::post().to(create_zone)),
            )
            .service(
                web::resource("/zones/{zone_id}")
                    .route(web::put().to(update_zone))
                    .route(web::delete().to(delete_zone)),
            )
            .route("/locations", web::post().to(report_location))
            .route("/panic", web::post().to(panic))
            .route("/alerts", web::get().to(list_alerts))
            .route("/alerts/{alert_id}/resolve", web::post().to(resolve_alert)),
    );
}
