use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::grades::GradeListQuery;
use crate::models::homework::SubmitHomeworkRequest;
use crate::models::users::UserRole;
use crate::services::StudentService;
use crate::utils::SafeHomeworkId;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn my_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.my_grades(&req, query.into_inner()).await
}

pub async fn my_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.my_attendance(&req).await
}

pub async fn my_timetable(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.my_timetable(&req).await
}

pub async fn my_bulletins(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.my_bulletins(&req).await
}

pub async fn my_homework(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.my_homework(&req).await
}

pub async fn submit_homework(
    req: HttpRequest,
    path: SafeHomeworkId,
    body: web::Json<SubmitHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .submit_homework(&req, path.0, body.into_inner())
        .await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.dashboard(&req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/student")
            .wrap(RequireRole::new(UserRole::Student))
            .wrap(RequireJWT)
            .route("/grades", web::get().to(my_grades))
            .route("/attendance", web::get().to(my_attendance))
            .route("/timetable", web::get().to(my_timetable))
            .route("/bulletins", web::get().to(my_bulletins))
            .route("/homework", web::get().to(my_homework))
            .route(
                "/homework/{homework_id}/submit",
                web::post().to(submit_homework),
            )
            .route("/dashboard", web::get().to(dashboard)),
    );
}
