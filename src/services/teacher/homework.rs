use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::homework::{
    CreateHomeworkRequest, GradeSubmissionRequest, Homework, HomeworkListQuery, SubmissionStatus,
};
use crate::models::notifications::NotificationKind;
use crate::models::users::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, current_user, ensure_teaches_class, load_class, load_subject,
};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};
use crate::storage::Storage;

async fn load_homework(
    storage: &Arc<dyn Storage>,
    user: &User,
    homework_id: i64,
) -> ActixResult<Homework> {
    let homework = storage
        .get_homework_by_id(homework_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::HomeworkNotFound, "Homework not found"))?;
    let class = load_class(storage, user, homework.class_id).await?;
    if homework.teacher_id != user.id {
        ensure_teaches_class(storage, user, &class).await?;
    }
    Ok(homework)
}

// 作业发布后通知班级学生
async fn announce(storage: &Arc<dyn Storage>, homework: &Homework) -> ActixResult<()> {
    let students = storage.list_class_students(homework.class_id).await?;
    let notice = Notice::new(
        NotificationKind::Homework,
        format!("New homework: {}", homework.title),
        format!("Due {}", homework.due_date.format("%Y-%m-%d %H:%M")),
    )
    .with_reference(homework.id);
    NotificationDispatcher::from_config(storage.clone())
        .notify_users(&students, &notice, &DeliveryPolicy::Only(Vec::new()))
        .await;
    Ok(())
}

pub async fn create_homework(
    service: &TeacherService,
    request: &HttpRequest,
    mut homework: CreateHomeworkRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    homework.title = homework.title.trim().to_string();
    if homework.title.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Title is required").into());
    }
    if let Some(points) = homework.max_points
        && !(points.is_finite() && points > 0.0)
    {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "max_points must be greater than 0",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, homework.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;
    load_subject(&storage, class.school_id, homework.subject_id).await?;

    let created = storage
        .create_homework(class.school_id, user.id, homework)
        .await?;
    if created.is_published {
        announce(&storage, &created).await?;
    }

    info!("Homework {} created for class {}", created.id, class.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Homework created")))
}

pub async fn publish_homework(
    service: &TeacherService,
    request: &HttpRequest,
    homework_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let homework = load_homework(&storage, &user, homework_id).await?;

    if homework.is_published {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            homework,
            "Homework already published",
        )));
    }

    let published = storage
        .publish_homework(homework.id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::HomeworkNotFound, "Homework not found"))?;
    announce(&storage, &published).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(published, "Homework published")))
}

pub async fn list_homework(
    service: &TeacherService,
    request: &HttpRequest,
    mut query: HomeworkListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match query.class_id {
        Some(class_id) => {
            let class = load_class(&storage, &user, class_id).await?;
            ensure_teaches_class(&storage, &user, &class).await?;
        }
        None => query.teacher_id = Some(user.id),
    }
    query.published_only = false;

    let homework = storage.list_homework(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(homework, "Homework retrieved")))
}

pub async fn list_submissions(
    service: &TeacherService,
    request: &HttpRequest,
    homework_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let homework = load_homework(&storage, &user, homework_id).await?;

    let submissions = storage.list_submissions(homework.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(submissions, "Submissions retrieved")))
}

pub async fn grade_submission(
    service: &TeacherService,
    request: &HttpRequest,
    submission_id: i64,
    grade: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found")
        })?;
    let homework = load_homework(&storage, &user, submission.homework_id).await?;

    if submission.status == SubmissionStatus::Graded {
        return Err(ApiError::conflict(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission is already graded",
        )
        .into());
    }
    let within_max = homework.max_points.is_none_or(|max| grade.grade <= max);
    if !grade.grade.is_finite() || grade.grade < 0.0 || !within_max {
        return Err(ApiError::bad_request(
            ErrorCode::GradeOutOfRange,
            "Grade must be between 0 and the homework max points",
        )
        .into());
    }

    let graded = storage
        .grade_submission(submission.id, user.id, grade)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found")
        })?;

    if let Some(student) = storage.get_user_by_id(graded.student_id).await? {
        let notice = Notice::new(
            NotificationKind::Homework,
            format!("Homework graded: {}", homework.title),
            match graded.grade {
                Some(value) => format!("Your submission received {value}"),
                None => "Your submission has been graded".to_string(),
            },
        )
        .with_reference(homework.id);
        NotificationDispatcher::from_config(storage.clone())
            .notify_user(&student, &notice, &DeliveryPolicy::Only(Vec::new()))
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Submission graded")))
}
