use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::notifications::{NotificationListParams, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    params: NotificationListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_notifications(user.id, params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Notifications retrieved")))
}

pub async fn unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let unread_count = storage.count_unread_notifications(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread_count },
        "Unread count retrieved",
    )))
}

pub async fn mark_read(
    service: &NotificationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 只能标记自己的通知
    if !storage.mark_notification_read(id, user.id).await? {
        return Err(ApiError::not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )
        .into());
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification marked as read")))
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let updated = storage.mark_all_notifications_read(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse {
            unread_count: 0,
        },
        format!("{updated} notification(s) marked as read"),
    )))
}
