use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::BulletinService;
use crate::models::bulletins::{
    Bulletin, BulletinDetail, BulletinGradeRow, BulletinListParams, BulletinListQuery,
    CreateBulletinRequest, NewBulletin, UpsertBulletinGradesRequest,
};
use crate::models::users::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, current_user, ensure_school_access, ensure_teaches_class, load_class, load_subject,
    load_term, require_school,
};
use crate::storage::Storage;

/// 按 ID 获取成绩单并检查学校范围
pub(crate) async fn load_bulletin(
    storage: &Arc<dyn Storage>,
    user: &User,
    bulletin_id: i64,
) -> Result<Bulletin, ApiError> {
    let bulletin = storage
        .get_bulletin_by_id(bulletin_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::BulletinNotFound, "Bulletin not found"))?;
    ensure_school_access(user, bulletin.school_id)?;
    Ok(bulletin)
}

pub async fn create_bulletin(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin: CreateBulletinRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = storage
        .get_active_enrollment(bulletin.student_id)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request(
                ErrorCode::ValidationFailed,
                "Student is not enrolled in any class",
            )
        })?;
    let class = load_class(&storage, &user, enrollment.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;
    let term = load_term(&storage, class.school_id, bulletin.term_id).await?;

    if storage
        .get_bulletin_by_student_term(bulletin.student_id, term.id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            ErrorCode::BulletinAlreadyExists,
            "A bulletin already exists for this student and term",
        )
        .into());
    }

    let created = storage
        .create_bulletin(NewBulletin {
            school_id: class.school_id,
            student_id: bulletin.student_id,
            class_id: class.id,
            term_id: term.id,
            created_by: user.id,
        })
        .await?;

    info!(
        "Bulletin {} created for student {} term {}",
        created.id, created.student_id, created.term_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Bulletin created")))
}

/// 写入科目成绩（仅草稿或被驳回状态），缺省系数取科目系数
pub async fn upsert_grades(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
    grades: UpsertBulletinGradesRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if grades.grades.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "No grades provided").into());
    }

    let storage = service.get_storage(request)?;
    let bulletin = load_bulletin(&storage, &user, bulletin_id).await?;
    let class = load_class(&storage, &user, bulletin.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    let locked = || {
        ApiError::conflict(
            ErrorCode::BulletinLocked,
            "Bulletin can only be edited while draft or rejected",
        )
    };
    if !bulletin.status.is_editable() {
        return Err(locked().into());
    }

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(grades.grades.len());
    for input in grades.grades {
        if !seen.insert(input.subject_id) {
            return Err(ApiError::bad_request(
                ErrorCode::ValidationFailed,
                format!("Subject {} appears more than once", input.subject_id),
            )
            .into());
        }
        let subject = load_subject(&storage, bulletin.school_id, input.subject_id).await?;
        let row = BulletinGradeRow {
            subject_id: subject.id,
            grade: input.grade,
            coefficient: input.coefficient.unwrap_or(subject.coefficient),
            comment: input.comment,
        };
        row.validate()
            .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
        rows.push(row);
    }

    let updated = storage
        .upsert_bulletin_grades(bulletin.id, bulletin.version, rows, grades.teacher_comment)
        .await?
        // 读取之后状态或版本已变
        .ok_or_else(|| {
            ApiError::conflict(
                ErrorCode::BulletinTransitionConflict,
                "Bulletin was modified concurrently, reload and retry",
            )
        })?;
    let grades = storage.list_bulletin_grades(updated.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BulletinDetail {
            bulletin: updated,
            grades,
        },
        "Bulletin grades saved",
    )))
}

pub async fn list_bulletins(
    service: &BulletinService,
    request: &HttpRequest,
    params: BulletinListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let school_id = if user.is_platform_admin() {
        None
    } else {
        Some(require_school(&user)?)
    };

    // 教师只能按自己任课的班级查询
    if user.active_role == UserRole::Teacher {
        let Some(class_id) = params.class_id else {
            return Err(
                ApiError::bad_request(ErrorCode::ValidationFailed, "class_id is required").into(),
            );
        };
        let class = load_class(&storage, &user, class_id).await?;
        ensure_teaches_class(&storage, &user, &class).await?;
    }

    let list = storage
        .list_bulletins(BulletinListQuery {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            school_id,
            class_id: params.class_id,
            term_id: params.term_id,
            student_ids: params.student_id.map(|id| vec![id]),
            status: params.status,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list, "Bulletins retrieved")))
}

pub async fn get_bulletin(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let bulletin = load_bulletin(&storage, &user, bulletin_id).await?;

    let grades = storage.list_bulletin_grades(bulletin.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BulletinDetail { bulletin, grades },
        "Bulletin retrieved",
    )))
}

pub async fn bulletin_history(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let bulletin = load_bulletin(&storage, &user, bulletin_id).await?;

    let approvals = storage.list_bulletin_approvals(bulletin.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(approvals, "History retrieved")))
}
