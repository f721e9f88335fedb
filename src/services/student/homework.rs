use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::homework::{
    HomeworkListQuery, StudentHomework, SubmissionStatus, SubmitHomeworkRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::storage::Storage;

/// 当前班级已发布的作业及本人提交
pub(crate) async fn homework_for_student(
    storage: &Arc<dyn Storage>,
    student_id: i64,
) -> ActixResult<Vec<StudentHomework>> {
    let Some(enrollment) = storage.get_active_enrollment(student_id).await? else {
        return Ok(Vec::new());
    };

    let homework = storage
        .list_homework(HomeworkListQuery {
            class_id: Some(enrollment.class_id),
            teacher_id: None,
            published_only: true,
        })
        .await?;
    let mut submissions = storage.list_student_submissions(student_id).await?;

    Ok(homework
        .into_iter()
        .map(|homework| {
            let submission = submissions
                .iter()
                .position(|s| s.homework_id == homework.id)
                .map(|idx| submissions.swap_remove(idx));
            StudentHomework {
                homework,
                submission,
            }
        })
        .collect())
}

pub async fn my_homework(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let items = homework_for_student(&storage, user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Homework retrieved")))
}

/// 每份作业一条提交；批改前可重复提交覆盖，逾期提交标记为迟交
pub async fn submit_homework(
    service: &StudentService,
    request: &HttpRequest,
    homework_id: i64,
    submission: SubmitHomeworkRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let has_content = submission
        .content
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if !has_content && submission.attachments.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Submission must contain text or attachments",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let not_found = || ApiError::not_found(ErrorCode::HomeworkNotFound, "Homework not found");
    let homework = storage
        .get_homework_by_id(homework_id)
        .await?
        .filter(|h| h.is_published)
        .ok_or_else(not_found)?;

    let in_class = storage
        .get_active_enrollment(user.id)
        .await?
        .is_some_and(|e| e.class_id == homework.class_id);
    if !in_class {
        return Err(not_found().into());
    }

    // 附件须为本人上传的文件
    for token in &submission.attachments {
        let owned = storage
            .get_file_by_token(token)
            .await?
            .is_some_and(|f| f.uploader_id == user.id);
        if !owned {
            return Err(ApiError::bad_request(
                ErrorCode::FileNotFound,
                format!("Attachment {token} not found"),
            )
            .into());
        }
    }

    if let Some(existing) = storage.get_submission(homework.id, user.id).await?
        && existing.status == SubmissionStatus::Graded
    {
        return Err(ApiError::conflict(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission is already graded",
        )
        .into());
    }

    let is_late = chrono::Utc::now() > homework.due_date;
    let saved = storage
        .upsert_submission(homework.id, user.id, submission, is_late)
        .await?;

    info!(
        "Student {} submitted homework {} (late: {})",
        user.id, homework.id, is_late
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Homework submitted")))
}
