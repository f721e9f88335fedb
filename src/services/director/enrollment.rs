use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectorService;
use crate::models::classes::{EnrollOutcome, EnrollStudentRequest, LinkParentRequest};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, current_user, load_class, load_school_member, require_school,
};

/// 学生同一时间只能有一个有效班级，且班级人数不超过上限
pub async fn enroll_student(
    service: &DirectorService,
    request: &HttpRequest,
    class_id: i64,
    enroll: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;
    let student =
        load_school_member(&storage, class.school_id, enroll.student_id, UserRole::Student).await?;

    match storage.enroll_student(class.id, student.id).await? {
        EnrollOutcome::Enrolled(enrollment) => {
            info!("Student {} enrolled in class {}", student.id, class.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Student enrolled successfully")))
        }
        EnrollOutcome::AlreadyEnrolled => Err(ApiError::conflict(
            ErrorCode::AlreadyEnrolled,
            "Student already has an active enrollment",
        )
        .into()),
        EnrollOutcome::ClassFull => Err(ApiError::conflict(
            ErrorCode::ClassFull,
            format!("Class is full ({} students)", class.max_students),
        )
        .into()),
    }
}

pub async fn link_parent(
    service: &DirectorService,
    request: &HttpRequest,
    link: LinkParentRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    load_school_member(&storage, school_id, link.parent_id, UserRole::Parent).await?;
    load_school_member(&storage, school_id, link.student_id, UserRole::Student).await?;

    if storage
        .get_parent_student_relation(link.parent_id, link.student_id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            ErrorCode::Conflict,
            "Parent is already linked to this student",
        )
        .into());
    }

    let relation = storage.link_parent(link).await?;
    info!(
        "Parent {} linked to student {}",
        relation.parent_id, relation.student_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(relation, "Parent linked successfully")))
}
