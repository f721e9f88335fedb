use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::bulletins::{
    BulkPublishRequest, BulkReviewRequest, BulletinListParams, CreateBulletinRequest,
    ReviewBulletinRequest, SubmitBulletinRequest, UpsertBulletinGradesRequest,
    VerifyBulletinRequest,
};
use crate::models::users::UserRole;
use crate::services::BulletinService;
use crate::utils::SafeBulletinId;

static BULLETIN_SERVICE: Lazy<BulletinService> = Lazy::new(BulletinService::new_lazy);

pub async fn create(
    req: HttpRequest,
    body: web::Json<CreateBulletinRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.create(&req, body.into_inner()).await
}

pub async fn list(
    req: HttpRequest,
    query: web::Query<BulletinListParams>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.list(&req, query.into_inner()).await
}

pub async fn get(req: HttpRequest, path: SafeBulletinId) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.get(&req, path.0).await
}

pub async fn history(req: HttpRequest, path: SafeBulletinId) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.history(&req, path.0).await
}

pub async fn upsert_grades(
    req: HttpRequest,
    path: SafeBulletinId,
    body: web::Json<UpsertBulletinGradesRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE
        .upsert_grades(&req, path.0, body.into_inner())
        .await
}

pub async fn submit(
    req: HttpRequest,
    path: SafeBulletinId,
    body: web::Json<SubmitBulletinRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE
        .submit(&req, path.0, body.into_inner())
        .await
}

pub async fn review(
    req: HttpRequest,
    path: SafeBulletinId,
    body: web::Json<ReviewBulletinRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE
        .review(&req, path.0, body.into_inner())
        .await
}

pub async fn publish(req: HttpRequest, path: SafeBulletinId) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.publish(&req, path.0).await
}

pub async fn bulk_review(
    req: HttpRequest,
    body: web::Json<BulkReviewRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.bulk_review(&req, body.into_inner()).await
}

pub async fn bulk_publish(
    req: HttpRequest,
    body: web::Json<BulkPublishRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.bulk_publish(&req, body.into_inner()).await
}

// 公开验证，无需登录
pub async fn verify(
    req: HttpRequest,
    body: web::Json<VerifyBulletinRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.verify(&req, body.into_inner()).await
}

// 配置路由；审核与发布仅限学校管理者
pub fn configure_bulletin_routes(cfg: &mut web::ServiceConfig) {
    // 公开验证端点须先于 /api/bulletins 作用域注册
    cfg.service(
        web::resource("/api/bulletins/verify")
            .wrap(RateLimit::bulletin_verify())
            .route(web::post().to(verify)),
    );
    cfg.service(
        web::scope("/api/bulletins")
            .wrap(RequireRole::new_any(UserRole::staff_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(create)),
            )
            .service(
                web::scope("/bulk")
                    .wrap(RequireRole::new_any(UserRole::school_manager_roles()))
                    .route("/review", web::post().to(bulk_review))
                    .route("/publish", web::post().to(bulk_publish)),
            )
            .route("/{bulletin_id}", web::get().to(get))
            .route("/{bulletin_id}/history", web::get().to(history))
            .route("/{bulletin_id}/grades", web::put().to(upsert_grades))
            .route("/{bulletin_id}/submit", web::post().to(submit))
            .service(
                web::resource("/{bulletin_id}/review")
                    .wrap(RequireRole::new_any(UserRole::school_manager_roles()))
                    .route(web::post().to(review)),
            )
            .service(
                web::resource("/{bulletin_id}/publish")
                    .wrap(RequireRole::new_any(UserRole::school_manager_roles()))
                    .route(web::post().to(publish)),
            ),
    );
}
