//! 家庭安全定位：设备、安全区域、位置上报与告警

pub mod access;
pub mod alerts;
pub mod devices;
pub mod geofence;
pub mod tracking;
pub mod zones;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::geolocation::{
    AlertListQuery, CreateSafeZoneRequest, LocationUpdateRequest, PanicRequest,
    RegisterDeviceRequest, UpdateSafeZoneRequest, ZoneListQuery,
};
use crate::storage::Storage;

pub struct GeolocationService {
    storage: Option<Arc<dyn Storage>>,
}

impl GeolocationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn register_device(
        &self,
        request: &HttpRequest,
        device: RegisterDeviceRequest,
    ) -> ActixResult<HttpResponse> {
        devices::register_device(self, request, device).await
    }

    pub async fn list_devices(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        devices::list_devices(self, request).await
    }

    pub async fn delete_device(
        &self,
        request: &HttpRequest,
        device_id: i64,
    ) -> ActixResult<HttpResponse> {
        devices::delete_device(self, request, device_id).await
    }

    pub async fn create_zone(
        &self,
        request: &HttpRequest,
        zone: CreateSafeZoneRequest,
    ) -> ActixResult<HttpResponse> {
        zones::create_zone(self, request, zone).await
    }

    pub async fn list_zones(
        &self,
        request: &HttpRequest,
        query: ZoneListQuery,
    ) -> ActixResult<HttpResponse> {
        zones::list_zones(self, request, query).await
    }

    pub async fn update_zone(
        &self,
        request: &HttpRequest,
        zone_id: i64,
        update: UpdateSafeZoneRequest,
    ) -> ActixResult<HttpResponse> {
        zones::update_zone(self, request, zone_id, update).await
    }

    pub async fn delete_zone(
        &self,
        request: &HttpRequest,
        zone_id: i64,
    ) -> ActixResult<HttpResponse> {
        zones::delete_zone(self, request, zone_id).await
    }

    pub async fn report_location(
        &self,
        request: &HttpRequest,
        update: LocationUpdateRequest,
    ) -> ActixResult<HttpResponse> {
        tracking::report_location(self, request, update).await
    }

    pub async fn device_status(
        &self,
        request: &HttpRequest,
        device_id: i64,
    ) -> ActixResult<HttpResponse> {
        tracking::device_status(self, request, device_id).await
    }

    pub async fn panic(
        &self,
        request: &HttpRequest,
        panic: PanicRequest,
    ) -> ActixResult<HttpResponse> {
        tracking::panic(self, request, panic).await
    }

    pub async fn list_alerts(
        &self,
        request: &HttpRequest,
        query: AlertListQuery,
    ) -> ActixResult<HttpResponse> {
        alerts::list_alerts(self, request, query).await
    }

    pub async fn resolve_alert(
        &self,
        request: &HttpRequest,
        alert_id: i64,
    ) -> ActixResult<HttpResponse> {
        alerts::resolve_alert(self, request, alert_id).await
    }
}
