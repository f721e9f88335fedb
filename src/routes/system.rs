use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SystemService;

static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

pub async fn get_settings() -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings().await
}

// 配置路由，均为公开端点
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/system")
            .route("/health", web::get().to(health))
            .route("/settings", web::get().to(get_settings)),
    );
}
