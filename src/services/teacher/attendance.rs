use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::attendance::{AttendanceQuery, AttendanceUpsert, MarkAttendanceRequest};
use crate::models::notifications::NotificationKind;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_teaches_class, load_class};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};

/// 按学生与日期写入考勤；缺勤和迟到的记录通知家长，每条记录只通知一次
pub async fn mark_attendance(
    service: &TeacherService,
    request: &HttpRequest,
    mark: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if mark.records.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "No attendance records").into());
    }

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, mark.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    let students = storage.list_class_students(class.id).await?;
    let enrolled: HashSet<i64> = students.iter().map(|s| s.id).collect();
    if let Some(outsider) = mark.records.iter().find(|r| !enrolled.contains(&r.student_id)) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("Student {} is not enrolled in this class", outsider.student_id),
        )
        .into());
    }

    let upserts = mark
        .records
        .into_iter()
        .map(|r| AttendanceUpsert {
            student_id: r.student_id,
            class_id: class.id,
            school_id: class.school_id,
            date: mark.date,
            status: r.status,
            reason: r.reason,
            marked_by: user.id,
        })
        .collect();
    let mut records = storage.upsert_attendance(upserts).await?;

    let dispatcher = NotificationDispatcher::from_config(storage.clone());
    let mut notified = Vec::new();
    for record in records
        .iter()
        .filter(|r| r.status.requires_parent_notice() && !r.parent_notified)
    {
        let name = students
            .iter()
            .find(|s| s.id == record.student_id)
            .map(|s| s.full_name())
            .unwrap_or_default();
        let notice = Notice::new(
            NotificationKind::Attendance,
            format!("Attendance: {}", record.status),
            format!("{} was marked {} on {}.", name, record.status, record.date),
        )
        .with_reference(record.id);
        dispatcher
            .notify_parents_of(record.student_id, &notice, &DeliveryPolicy::Preferences)
            .await;
        notified.push(record.id);
    }

    if !notified.is_empty() {
        storage.mark_attendance_notified(&notified).await?;
        for record in records.iter_mut().filter(|r| notified.contains(&r.id)) {
            record.parent_notified = true;
        }
        info!(
            "Parents notified for {} attendance record(s) in class {}",
            notified.len(),
            class.id
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(records, "Attendance recorded")))
}

pub async fn list_attendance(
    service: &TeacherService,
    request: &HttpRequest,
    query: AttendanceQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let Some(class_id) = query.class_id else {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "class_id is required").into());
    };

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    let records = storage.list_attendance(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records, "Attendance retrieved")))
}
