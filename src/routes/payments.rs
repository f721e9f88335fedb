use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::models::payments::{CreatePaymentIntentRequest, PaymentHistoryParams};
use crate::services::PaymentService;

static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn plans() -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.plans().await
}

pub async fn create_intent(
    req: HttpRequest,
    body: web::Json<CreatePaymentIntentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .create_payment_intent(&req, body.into_inner())
        .await
}

pub async fn history(
    req: HttpRequest,
    query: web::Query<PaymentHistoryParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.history(&req, query.into_inner()).await
}

// 原始请求体参与签名校验，不能先反序列化
pub async fn webhook(req: HttpRequest, body: web::Bytes) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.webhook(&req, body).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/payments/plans").route(web::get().to(plans)));
    cfg.service(
        web::resource("/api/payments/webhook")
            .wrap(RateLimit::webhook())
            .route(web::post().to(webhook)),
    );
    cfg.service(
        web::scope("/api/payments")
            .wrap(RequireJWT)
            .route("/intent", web::post().to(create_intent))
            .route("/history", web::get().to(history)),
    );
}
