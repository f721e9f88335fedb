use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::bulletins::VerifyBulletinRequest;
use crate::models::grades::GradeListQuery;
use crate::models::parent_requests::CreateParentRequest;
use crate::models::users::UserRole;
use crate::services::{BulletinService, ParentService};
use crate::utils::SafeStudentId;

static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);
static BULLETIN_SERVICE: Lazy<BulletinService> = Lazy::new(BulletinService::new_lazy);

pub async fn children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.children(&req).await
}

pub async fn child_grades(
    req: HttpRequest,
    path: SafeStudentId,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .child_grades(&req, path.0, query.into_inner())
        .await
}

pub async fn child_attendance(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_attendance(&req, path.0).await
}

pub async fn child_bulletins(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_bulletins(&req, path.0).await
}

pub async fn create_request(
    req: HttpRequest,
    body: web::Json<CreateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.create_request(&req, body.into_inner()).await
}

pub async fn list_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_requests(&req).await
}

// 家长验证会在成绩单上记录 parent_verified
pub async fn verify_bulletin(
    req: HttpRequest,
    body: web::Json<VerifyBulletinRequest>,
) -> ActixResult<HttpResponse> {
    BULLETIN_SERVICE.verify(&req, body.into_inner()).await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.dashboard(&req).await
}

// 配置路由
pub fn configure_parent_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/parent")
            .wrap(RequireRole::new(UserRole::Parent))
            .wrap(RequireJWT)
            .route("/children", web::get().to(children))
            .route("/children/{student_id}/grades", web::get().to(child_grades))
            .route(
                "/children/{student_id}/attendance",
                web::get().to(child_attendance),
            )
            .route(
                "/children/{student_id}/bulletins",
                web::get().to(child_bulletins),
            )
            .service(
                web::resource("/requests")
                    .route(web::get().to(list_requests))
                    .route(web::post().to(create_request)),
            )
            .service(
                web::resource("/bulletins/verify")
                    .wrap(RateLimit::bulletin_verify())
                    .route(web::post().to(verify_bulletin)),
            )
            .route("/dashboard", web::get().to(dashboard)),
    );
}
