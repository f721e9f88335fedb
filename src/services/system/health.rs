use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::warn;

use crate::models::system::{ComponentStatus, HealthResponse};
use crate::models::{ApiResponse, AppStartTime};
use crate::services::common::storage_from_request;

/// 存活检查；数据库不可用时返回 503
pub async fn health(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or_else(chrono::Utc::now);

    let database = match storage_from_request(request) {
        Ok(storage) => match storage.ping().await {
            Ok(()) => ComponentStatus::Ok,
            Err(e) => {
                warn!("Health check database ping failed: {}", e);
                ComponentStatus::Unavailable
            }
        },
        Err(_) => ComponentStatus::Unavailable,
    };

    let response = HealthResponse {
        status: if database == ComponentStatus::Ok {
            ComponentStatus::Ok
        } else {
            ComponentStatus::Degraded
        },
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (chrono::Utc::now() - started_at).num_seconds(),
        started_at,
    };

    let mut builder = if response.is_healthy() {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    Ok(builder.json(ApiResponse::success(response, "Health check")))
}
