use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MessageService;
use super::recipients::resolve_recipients;
use crate::models::messages::{MessagePriority, NewMessage, SendMessageRequest, SendMessageResponse};
use crate::models::notifications::NotificationKind;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};

pub async fn send_message(
    service: &MessageService,
    request: &HttpRequest,
    mut message: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let sender = current_user(request)?;

    message.subject = message.subject.trim().to_string();
    message.content = message.content.trim().to_string();
    if message.subject.is_empty() || message.content.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Subject and content are required",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let recipients = resolve_recipients(&storage, &sender, &message).await?;
    if recipients.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "No recipients matched this message",
        )
        .into());
    }

    let policy = if message.priority == MessagePriority::Urgent {
        DeliveryPolicy::Urgent
    } else {
        DeliveryPolicy::Only(message.channels.clone())
    };

    let saved = storage
        .create_message(NewMessage {
            school_id: sender.school_id,
            sender_id: sender.id,
            recipient_type: message.recipient_type,
            subject: message.subject.clone(),
            content: message.content.clone(),
            category: message.category,
            priority: message.priority,
            recipient_ids: recipients.iter().map(|u| u.id).collect(),
        })
        .await?;

    let notice = Notice::new(
        NotificationKind::Message,
        format!("{}: {}", sender.full_name(), message.subject),
        message.content,
    )
    .with_reference(saved.id);
    let delivered_to = NotificationDispatcher::from_config(storage.clone())
        .notify_users(&recipients, &notice, &policy)
        .await;

    info!(
        "Message {} sent by {} to {} recipient(s)",
        saved.id, sender.id, delivered_to
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        SendMessageResponse {
            message: saved,
            delivered_to,
        },
        "Message sent",
    )))
}
