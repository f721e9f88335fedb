use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::classes::{
    CreateClassRequest, CreateMemberRequest, CreateSubjectRequest, EnrollStudentRequest,
    LinkParentRequest, StudentListQuery, UpdateClassRequest,
};
use crate::models::parent_requests::{ParentRequestListQuery, RespondParentRequest};
use crate::models::schools::{CreateTermRequest, UpdateSchoolRequest};
use crate::models::timetable::{CreateTimetableSlotRequest, TimetableQuery};
use crate::models::users::UserRole;
use crate::services::DirectorService;
use crate::utils::{SafeClassId, SafeIDI64};

static DIRECTOR_SERVICE: Lazy<DirectorService> = Lazy::new(DirectorService::new_lazy);

pub async fn school_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.school_profile(&req).await
}

pub async fn update_school_profile(
    req: HttpRequest,
    body: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .update_school_profile(&req, body.into_inner())
        .await
}

pub async fn create_term(
    req: HttpRequest,
    body: web::Json<CreateTermRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.create_term(&req, body.into_inner()).await
}

pub async fn list_terms(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_terms(&req).await
}

pub async fn activate_term(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.activate_term(&req, path.0).await
}

pub async fn create_class(
    req: HttpRequest,
    body: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.create_class(&req, body.into_inner()).await
}

pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_classes(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    path: SafeClassId,
    body: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .update_class(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, path: SafeClassId) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.delete_class(&req, path.0).await
}

pub async fn enroll_student(
    req: HttpRequest,
    path: SafeClassId,
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .enroll_student(&req, path.0, body.into_inner())
        .await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.create_subject(&req, body.into_inner()).await
}

pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_subjects(&req).await
}

pub async fn delete_subject(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.delete_subject(&req, path.0).await
}

pub async fn create_member(
    req: HttpRequest,
    body: web::Json<CreateMemberRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.create_member(&req, body.into_inner()).await
}

pub async fn list_teachers(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_teachers(&req).await
}

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn link_parent(
    req: HttpRequest,
    body: web::Json<LinkParentRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.link_parent(&req, body.into_inner()).await
}

pub async fn create_timetable_slot(
    req: HttpRequest,
    body: web::Json<CreateTimetableSlotRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .create_timetable_slot(&req, body.into_inner())
        .await
}

pub async fn list_timetable(
    req: HttpRequest,
    query: web::Query<TimetableQuery>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.list_timetable(&req, query.into_inner()).await
}

pub async fn delete_timetable_slot(
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.delete_timetable_slot(&req, path.0).await
}

pub async fn list_parent_requests(
    req: HttpRequest,
    query: web::Query<ParentRequestListQuery>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .list_parent_requests(&req, query.into_inner())
        .await
}

pub async fn respond_parent_request(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<RespondParentRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE
        .respond_parent_request(&req, path.0, body.into_inner())
        .await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DIRECTOR_SERVICE.dashboard(&req).await
}

// 配置路由
pub fn configure_director_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/director")
            .wrap(RequireRole::new_any(UserRole::school_manager_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("/school")
                    .route(web::get().to(school_profile))
                    .route(web::put().to(update_school_profile)),
            )
            .service(
                web::resource("/terms")
                    .route(web::get().to(list_terms))
                    .route(web::post().to(create_term)),
            )
            .route("/terms/{id}/activate", web::post().to(activate_term))
            .service(
                web::resource("/classes")
                    .route(web::get().to(list_classes))
                    .route(web::post().to(create_class)),
            )
            .service(
                web::resource("/classes/{class_id}")
                    .route(web::put().to(update_class))
                    .route(web::delete().to(delete_class)),
            )
            .route("/classes/{class_id}/enroll", web::post().to(enroll_student))
            .service(
                web::resource("/subjects")
                    .route(web::get().to(list_subjects))
                    .route(web::post().to(create_subject)),
            )
            .route("/subjects/{id}", web::delete().to(delete_subject))
            .route("/members", web::post().to(create_member))
            .route("/teachers", web::get().to(list_teachers))
            .route("/students", web::get().to(list_students))
            .route("/parent-links", web::post().to(link_parent))
            .service(
                web::resource("/timetable")
                    .route(web::get().to(list_timetable))
                    .route(web::post().to(create_timetable_slot)),
            )
            .route("/timetable/{id}", web::delete().to(delete_timetable_slot))
            .route("/parent-requests", web::get().to(list_parent_requests))
            .route("/parent-requests/{id}", web::put().to(respond_parent_request))
            .route("/dashboard", web::get().to(dashboard)),
    );
}
