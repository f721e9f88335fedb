use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessageService;
use crate::models::messages::MessageListParams;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::common::{ApiError, current_user};

pub async fn list_inbox(
    service: &MessageService,
    request: &HttpRequest,
    params: MessageListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let inbox = storage.list_inbox(user.id, params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(inbox, "Inbox retrieved")))
}

pub async fn list_sent(
    service: &MessageService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let sent = storage.list_sent_messages(user.id, pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(sent, "Sent messages retrieved")))
}

pub async fn mark_read(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if !storage.mark_message_read(message_id, user.id).await? {
        return Err(ApiError::not_found(ErrorCode::MessageNotFound, "Message not found").into());
    }
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Message marked as read")))
}
