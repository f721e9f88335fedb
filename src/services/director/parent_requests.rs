use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectorService;
use crate::models::notifications::NotificationKind;
use crate::models::parent_requests::{ParentRequestListQuery, RespondParentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_school_access, require_school};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};

pub async fn list_parent_requests(
    service: &DirectorService,
    request: &HttpRequest,
    query: ParentRequestListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let requests = storage
        .list_parent_requests(Some(school_id), None, query.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests, "Parent requests retrieved")))
}

/// 处理家长申请并通知家长；终态不可再变更
pub async fn respond_parent_request(
    service: &DirectorService,
    request: &HttpRequest,
    request_id: i64,
    response: RespondParentRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage
        .get_parent_request_by_id(request_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(ErrorCode::ParentRequestNotFound, "Parent request not found")
        })?;
    ensure_school_access(&user, existing.school_id)?;

    if !existing.status.can_transition_to(response.status) {
        return Err(ApiError::bad_request(
            ErrorCode::ParentRequestInvalidStatus,
            format!(
                "Cannot change request status from {} to {}",
                existing.status, response.status
            ),
        )
        .into());
    }

    let updated = storage
        .respond_parent_request(existing.id, existing.status, response, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::conflict(
                ErrorCode::ParentRequestInvalidStatus,
                "Request was updated concurrently",
            )
        })?;
    info!(
        "Parent request {} moved to {} by {}",
        updated.id, updated.status, user.id
    );

    if let Some(parent) = storage.get_user_by_id(updated.parent_id).await? {
        let notice = Notice::new(
            NotificationKind::ParentRequest,
            format!("Request update: {}", updated.subject),
            match &updated.admin_response {
                Some(text) => format!("Your request is now {}. {}", updated.status, text),
                None => format!("Your request is now {}.", updated.status),
            },
        )
        .with_reference(updated.id);
        NotificationDispatcher::from_config(storage.clone())
            .notify_user(&parent, &notice, &DeliveryPolicy::Preferences)
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Parent request updated")))
}
