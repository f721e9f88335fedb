use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::attendance::AttendanceQuery;
use crate::models::bulletins::{BulletinListQuery, BulletinStatus};
use crate::models::grades::GradeListQuery;
use crate::models::timetable::TimetableQuery;
use crate::services::common::{current_user, require_school};

pub async fn my_grades(
    service: &StudentService,
    request: &HttpRequest,
    mut query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    query.student_id = Some(user.id);
    query.published_only = true;
    let grades = storage.list_grades(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "Grades retrieved")))
}

pub async fn my_attendance(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let records = storage
        .list_attendance(AttendanceQuery {
            student_id: Some(user.id),
            ..Default::default()
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records, "Attendance retrieved")))
}

pub async fn my_timetable(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    // 未注册班级时课表为空
    let slots = match storage.get_active_enrollment(user.id).await? {
        Some(enrollment) => {
            storage
                .list_timetable(
                    school_id,
                    TimetableQuery {
                        class_id: Some(enrollment.class_id),
                        ..Default::default()
                    },
                )
                .await?
        }
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots, "Timetable retrieved")))
}

pub async fn my_bulletins(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let bulletins = storage
        .list_bulletins(BulletinListQuery {
            student_ids: Some(vec![user.id]),
            status: Some(BulletinStatus::Published),
            size: Some(100),
            ..Default::default()
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(bulletins.items, "Bulletins retrieved")))
}
