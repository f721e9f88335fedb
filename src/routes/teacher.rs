use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::attendance::{AttendanceQuery, MarkAttendanceRequest};
use crate::models::grades::{
    CreateGradeRequest, GradeListQuery, PublishGradesRequest, UpdateGradeRequest,
};
use crate::models::homework::{CreateHomeworkRequest, GradeSubmissionRequest, HomeworkListQuery};
use crate::models::users::UserRole;
use crate::services::TeacherService;
use crate::utils::{SafeClassId, SafeHomeworkId, SafeIDI64};

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

// 校长也可以代为录入
const TEACHING_ROLES: &[&UserRole] = &[&UserRole::Teacher, &UserRole::Freelancer, &UserRole::Director];

pub async fn my_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.my_classes(&req).await
}

pub async fn class_students(req: HttpRequest, path: SafeClassId) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.class_students(&req, path.0).await
}

pub async fn my_timetable(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.my_timetable(&req).await
}

pub async fn record_grade(
    req: HttpRequest,
    body: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.record_grade(&req, body.into_inner()).await
}

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_grades(&req, query.into_inner()).await
}

pub async fn update_grade(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_grade(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_grade(&req, path.0).await
}

pub async fn publish_grades(
    req: HttpRequest,
    body: web::Json<PublishGradesRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.publish_grades(&req, body.into_inner()).await
}

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.mark_attendance(&req, body.into_inner()).await
}

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_attendance(&req, query.into_inner()).await
}

pub async fn create_homework(
    req: HttpRequest,
    body: web::Json<CreateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.create_homework(&req, body.into_inner()).await
}

pub async fn publish_homework(
    req: HttpRequest,
    path: SafeHomeworkId,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.publish_homework(&req, path.0).await
}

pub async fn list_homework(
    req: HttpRequest,
    query: web::Query<HomeworkListQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_homework(&req, query.into_inner()).await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: SafeHomeworkId,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_submissions(&req, path.0).await
}

pub async fn grade_submission(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .grade_submission(&req, path.0, body.into_inner())
        .await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.dashboard(&req).await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/teacher")
            .wrap(RequireRole::new_any(TEACHING_ROLES))
            .wrap(RequireJWT)
            .route("/classes", web::get().to(my_classes))
            .route("/classes/{class_id}/students", web::get().to(class_students))
            .route("/timetable", web::get().to(my_timetable))
            .service(
                web::resource("/grades")
                    .route(web::get().to(list_grades))
                    .route(web::post().to(record_grade)),
            )
            .route("/grades/publish", web::post().to(publish_grades))
            .service(
                web::resource("/grades/{id}")
                    .route(web::put().to(update_grade))
                    .route(web::delete().to(delete_grade)),
            )
            .service(
                web::resource("/attendance")
                    .route(web::get().to(list_attendance))
                    .route(web::post().to(mark_attendance)),
            )
            .service(
                web::resource("/homework")
                    .route(web::get().to(list_homework))
                    .route(web::post().to(create_homework)),
            )
            .route(
                "/homework/{homework_id}/publish",
                web::post().to(publish_homework),
            )
            .route(
                "/homework/{homework_id}/submissions",
                web::get().to(list_submissions),
            )
            .route("/submissions/{id}/grade", web::post().to(grade_submission))
            .route("/dashboard", web::get().to(dashboard)),
    );
}
