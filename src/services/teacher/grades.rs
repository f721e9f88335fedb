use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::grades::{
    CreateGradeRequest, Grade, GradeListQuery, PublishGradesRequest, UpdateGradeRequest,
    validate_grade_value,
};
use crate::models::notifications::NotificationKind;
use crate::models::users::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, current_user, ensure_teaches_class, load_class, load_subject, load_term,
};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};
use crate::storage::Storage;

pub async fn record_grade(
    service: &TeacherService,
    request: &HttpRequest,
    grade: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    grade
        .validate()
        .map_err(|msg| ApiError::bad_request(ErrorCode::GradeOutOfRange, msg))?;

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, grade.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;
    load_subject(&storage, class.school_id, grade.subject_id).await?;
    load_term(&storage, class.school_id, grade.term_id).await?;

    // 学生须在该班有有效注册
    let enrolled = storage
        .get_active_enrollment(grade.student_id)
        .await?
        .is_some_and(|e| e.class_id == class.id);
    if !enrolled {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Student is not enrolled in this class",
        )
        .into());
    }

    let created = storage.create_grade(user.id, grade).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Grade recorded")))
}

pub async fn list_grades(
    service: &TeacherService,
    request: &HttpRequest,
    mut query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let Some(class_id) = query.class_id else {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "class_id is required").into());
    };

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    query.published_only = false;
    let grades = storage.list_grades(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "Grades retrieved")))
}

// 成绩只能由记录者或该班任课教师修改
async fn load_own_grade(
    storage: &Arc<dyn Storage>,
    user: &User,
    grade_id: i64,
) -> ActixResult<Grade> {
    let grade = storage
        .get_grade_by_id(grade_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::GradeNotFound, "Grade not found"))?;
    let class = load_class(storage, user, grade.class_id).await?;
    if grade.teacher_id != user.id {
        ensure_teaches_class(storage, user, &class).await?;
    }
    Ok(grade)
}

pub async fn update_grade(
    service: &TeacherService,
    request: &HttpRequest,
    grade_id: i64,
    update: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let grade = load_own_grade(&storage, &user, grade_id).await?;

    let value = update.value.unwrap_or(grade.value);
    let max_value = update.max_value.unwrap_or(grade.max_value);
    validate_grade_value(value, max_value)
        .map_err(|msg| ApiError::bad_request(ErrorCode::GradeOutOfRange, msg))?;

    let updated = storage
        .update_grade(grade.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::GradeNotFound, "Grade not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Grade updated")))
}

pub async fn delete_grade(
    service: &TeacherService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let grade = load_own_grade(&storage, &user, grade_id).await?;

    storage.delete_grade(grade.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Grade deleted")))
}

/// 向家长发布班级某学期的成绩，并通知学生家长
pub async fn publish_grades(
    service: &TeacherService,
    request: &HttpRequest,
    publish: PublishGradesRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, publish.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;
    let term = load_term(&storage, class.school_id, publish.term_id).await?;

    let published = storage.publish_grades(class.id, term.id).await?;
    info!(
        "{} grade(s) published for class {} term {} by {}",
        published, class.id, term.id, user.id
    );

    if published > 0 {
        let student_ids: Vec<i64> = storage
            .list_class_students(class.id)
            .await?
            .iter()
            .map(|s| s.id)
            .collect();
        let notice = Notice::new(
            NotificationKind::Grade,
            "New grades available",
            format!("New grades for {} ({}) have been published.", class.name, term.name),
        )
        .with_reference(class.id);
        NotificationDispatcher::from_config(storage.clone())
            .notify_parents_of_students(&student_ids, &notice, &DeliveryPolicy::Preferences)
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(format!(
        "{published} grade(s) published"
    ))))
}
