use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::ApiResponse;
use crate::models::timetable::TimetableQuery;
use crate::services::common::{current_user, ensure_teaches_class, load_class, require_school};

pub async fn my_classes(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let classes = storage.list_teacher_classes(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "Classes retrieved")))
}

pub async fn class_students(
    service: &TeacherService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    let students = storage.list_class_students(class.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Students retrieved")))
}

pub async fn my_timetable(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let slots = storage
        .list_timetable(
            school_id,
            TimetableQuery {
                teacher_id: Some(user.id),
                ..Default::default()
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots, "Timetable retrieved")))
}
