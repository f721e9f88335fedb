use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::PaginationQuery;
use crate::models::messages::{MessageListParams, SendMessageRequest};
use crate::services::MessageService;
use crate::utils::SafeIDI64;

static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send(
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.send(&req, body.into_inner()).await
}

pub async fn inbox(
    req: HttpRequest,
    query: web::Query<MessageListParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.inbox(&req, query.into_inner()).await
}

pub async fn sent(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.sent(&req, query.into_inner()).await
}

pub async fn mark_read(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.mark_read(&req, path.0).await
}

// 配置路由；发送范围在业务层按角色检查
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/messages")
            .wrap(RequireJWT)
            .route("", web::post().to(send))
            .route("/inbox", web::get().to(inbox))
            .route("/sent", web::get().to(sent))
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
