use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::schools::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};
use crate::models::system::{SettingAuditQuery, UpdateSettingRequest};
use crate::models::users::{UpdateUserRequest, UserListParams, UserRole};
use crate::services::AdminService;
use crate::utils::{SafeIDI64, SafeSettingKey};

static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_users(&req, query.into_inner()).await
}

pub async fn get_user(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_user(&req, path.0).await
}

pub async fn update_user(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_user(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_user(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_user(&req, path.0).await
}

pub async fn create_school(
    req: HttpRequest,
    body: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_school(&req, body.into_inner()).await
}

pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_schools(&req, query.into_inner()).await
}

pub async fn get_school(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_school(&req, path.0).await
}

pub async fn update_school(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_school(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_school(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_school(&req, path.0).await
}

pub async fn get_settings(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_settings(&req).await
}

pub async fn update_setting(
    req: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_setting(&req, key.0, body.into_inner())
        .await
}

pub async fn setting_audits(
    req: HttpRequest,
    query: web::Query<SettingAuditQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.setting_audits(&req, query.into_inner()).await
}

pub async fn platform_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.platform_stats(&req).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(RequireRole::new_any(UserRole::platform_admin_roles()))
            .wrap(RequireJWT)
            .service(web::resource("/users").route(web::get().to(list_users)))
            .service(
                web::resource("/users/{id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user)),
            )
            .service(
                web::resource("/schools")
                    .route(web::get().to(list_schools))
                    .route(web::post().to(create_school)),
            )
            .service(
                web::resource("/schools/{id}")
                    .route(web::get().to(get_school))
                    .route(web::put().to(update_school))
                    .route(web::delete().to(delete_school)),
            )
            .route("/settings", web::get().to(get_settings))
            // 审计日志须在 {key} 之前注册
            .route("/settings/audits", web::get().to(setting_audits))
            .route("/settings/{key}", web::put().to(update_setting))
            .route("/stats", web::get().to(platform_stats)),
    );
}
