use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectorService;
use crate::models::timetable::{CreateTimetableSlotRequest, TimetableQuery};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, current_user, ensure_school_access, load_class, load_school_member, load_subject,
    require_school,
};

/// 创建课时，与同班、同教师或同教室的有效课时重叠时返回 409；
/// 教师在其他学校的课时也参与比较
pub async fn create_timetable_slot(
    service: &DirectorService,
    request: &HttpRequest,
    slot: CreateTimetableSlotRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let range = slot
        .validate()
        .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, slot.class_id).await?;
    let school_id = class.school_id;

    load_subject(&storage, school_id, slot.subject_id).await?;
    load_school_member(&storage, school_id, slot.teacher_id, UserRole::Teacher).await?;

    let same_day = storage
        .list_timetable(
            school_id,
            TimetableQuery {
                day_of_week: Some(slot.day_of_week),
                ..Default::default()
            },
        )
        .await?;
    if let Some(conflict) = same_day.into_iter().find(|s| s.conflicts_with(&slot, range)) {
        info!(
            "Timetable conflict for class {} with slot {}",
            slot.class_id, conflict.id
        );
        let message = format!("Conflicts with existing slot {}", conflict.id);
        return Ok(HttpResponse::Conflict().json(ApiResponse::error(
            ErrorCode::TimetableConflict,
            conflict,
            message,
        )));
    }

    // 兼课教师在其他学校的课时只比较时间，不暴露对方课表
    let elsewhere = storage
        .list_teacher_day_slots(slot.teacher_id, slot.day_of_week)
        .await?;
    if let Some(conflict) = elsewhere
        .iter()
        .find(|s| s.school_id != school_id && s.overlaps_teacher(&slot, range))
    {
        info!(
            "Teacher {} already teaches at school {} (slot {})",
            slot.teacher_id, conflict.school_id, conflict.id
        );
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::TimetableConflict,
            "Teacher is already scheduled at another school at this time",
        )));
    }

    let created = storage.create_timetable_slot(school_id, slot).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Timetable slot created")))
}

pub async fn list_timetable(
    service: &DirectorService,
    request: &HttpRequest,
    query: TimetableQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let slots = storage.list_timetable(school_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots, "Timetable retrieved")))
}

pub async fn delete_timetable_slot(
    service: &DirectorService,
    request: &HttpRequest,
    slot_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let slot = storage
        .get_timetable_slot(slot_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::NotFound, "Timetable slot not found"))?;
    ensure_school_access(&user, slot.school_id)?;

    storage.delete_timetable_slot(slot.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Timetable slot deleted")))
}
