use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::models::ApiResponse;
use crate::models::attendance::AttendanceQuery;
use crate::models::bulletins::{Bulletin, BulletinListQuery, BulletinStatus};
use crate::models::grades::GradeListQuery;
use crate::services::common::{current_user, ensure_parent_of};
use crate::storage::Storage;

pub async fn list_children(
    service: &ParentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let children = storage.list_children(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(children, "Children retrieved")))
}

pub async fn child_grades(
    service: &ParentService,
    request: &HttpRequest,
    student_id: i64,
    mut query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    ensure_parent_of(&storage, user.id, student_id).await?;

    query.student_id = Some(student_id);
    query.published_only = true;
    let grades = storage.list_grades(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "Grades retrieved")))
}

pub async fn child_attendance(
    service: &ParentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    ensure_parent_of(&storage, user.id, student_id).await?;

    let records = storage
        .list_attendance(AttendanceQuery {
            student_id: Some(student_id),
            ..Default::default()
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records, "Attendance retrieved")))
}

pub(crate) async fn published_bulletins(
    storage: &Arc<dyn Storage>,
    student_id: i64,
) -> ActixResult<Vec<Bulletin>> {
    let page = storage
        .list_bulletins(BulletinListQuery {
            student_ids: Some(vec![student_id]),
            status: Some(BulletinStatus::Published),
            size: Some(100),
            ..Default::default()
        })
        .await?;
    Ok(page.items)
}

pub async fn child_bulletins(
    service: &ParentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    ensure_parent_of(&storage, user.id, student_id).await?;

    let bulletins = published_bulletins(&storage, student_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(bulletins, "Bulletins retrieved")))
}
