use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::sandbox::SandboxLoginRequest;
use crate::services::SandboxService;

static SANDBOX_SERVICE: Lazy<SandboxService> = Lazy::new(SandboxService::new_lazy);

pub async fn status(req: HttpRequest) -> ActixResult<HttpResponse> {
    SANDBOX_SERVICE.status(&req).await
}

pub async fn login(
    req: HttpRequest,
    body: web::Json<SandboxLoginRequest>,
) -> ActixResult<HttpResponse> {
    SANDBOX_SERVICE.login(&req, body.into_inner()).await
}

// 配置路由；未启用沙盒时由业务层返回 404
pub fn configure_sandbox_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/sandbox")
            .route("/status", web::get().to(status))
            .service(
                web::resource("/login")
                    .wrap(RateLimit::sandbox_login())
                    .route(web::post().to(login)),
            ),
    );
}
