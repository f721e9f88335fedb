//! Stripe 回调处理
//!
//! 以 PaymentIntent id 幂等：只有 pending 状态的支付会被完成或标记失败，
//! 重复投递的事件只做确认。支付完成与订阅开通在存储层同一事务内提交。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use tracing::{info, warn};

use super::PaymentService;
use super::plans::{find_plan, subscription_end};
use super::stripe::verify_signature;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::notifications::NotificationKind;
use crate::models::payments::{PaymentStatus, WebhookAck};
use crate::models::users::{SubscriptionStatus, SubscriptionUpdate};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::ApiError;
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};
use crate::storage::Storage;

const SIGNATURE_HEADER: &str = "Stripe-Signature";

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
struct EventObject {
    #[serde(default)]
    id: String,
    #[serde(default)]
    metadata: EventMetadata,
    last_payment_error: Option<PaymentError>,
}

#[derive(Debug, Default, Deserialize)]
struct EventMetadata {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentError {
    message: Option<String>,
}

pub async fn handle_webhook(
    service: &PaymentService,
    request: &HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let config = &AppConfig::get().stripe;
    let header = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if let Err(reason) = verify_signature(
        &body,
        header,
        &config.webhook_secret,
        config.webhook_tolerance,
        chrono::Utc::now().timestamp(),
    ) {
        warn!("Rejected payment webhook: {}", reason);
        return Err(ApiError::bad_request(
            ErrorCode::WebhookSignatureInvalid,
            "Invalid webhook signature",
        )
        .into());
    }

    let event: StripeEvent = serde_json::from_slice(&body).map_err(|e| {
        ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("Invalid webhook payload: {e}"),
        )
    })?;

    let storage = service.get_storage(request)?;
    let object = event.data.object;
    let handled = match event.event_type.as_str() {
        "payment_intent.succeeded" => payment_succeeded(&storage, &object.id).await?,
        "payment_intent.payment_failed" => {
            let reason = object
                .last_payment_error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Payment failed".to_string());
            payment_failed(&storage, &object.id, &reason).await?
        }
        "customer.subscription.deleted" => {
            subscription_deleted(&storage, object.metadata.user_id.as_deref()).await?
        }
        other => {
            info!("Ignoring payment webhook event {}", other);
            false
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        WebhookAck {
            received: true,
            handled,
        },
        "Webhook received",
    )))
}

async fn payment_succeeded(storage: &Arc<dyn Storage>, intent_id: &str) -> Result<bool> {
    let Some(payment) = storage.get_payment_by_provider_id(intent_id).await? else {
        info!("Payment {} is unknown", intent_id);
        return Ok(false);
    };
    if payment.status != PaymentStatus::Pending {
        info!("Payment {} already processed", intent_id);
        return Ok(false);
    }

    let Some(plan) = find_plan(&payment.plan_id) else {
        warn!(
            "Completed payment {} references unknown plan {}",
            intent_id, payment.plan_id
        );
        return storage.complete_payment(intent_id, None).await;
    };

    let ends_at = subscription_end(chrono::Utc::now(), plan.interval);
    let activation = SubscriptionUpdate {
        plan_id: Some(plan.id.clone()),
        status: SubscriptionStatus::Active,
        ends_at: Some(ends_at.timestamp()),
    };
    if !storage.complete_payment(intent_id, Some(activation)).await? {
        info!("Payment {} settled concurrently", intent_id);
        return Ok(false);
    }

    info!(
        "Subscription {} activated for user {} until {}",
        plan.id, payment.user_id, ends_at
    );

    if let Some(user) = storage.get_user_by_id(payment.user_id).await? {
        let notice = Notice::new(
            NotificationKind::Payment,
            "Payment confirmed",
            format!("Your {} subscription is active until {}", plan.name, ends_at.format("%Y-%m-%d")),
        )
        .with_reference(payment.id);
        NotificationDispatcher::from_config(storage.clone())
            .notify_user(&user, &notice, &DeliveryPolicy::Preferences)
            .await;
    }
    Ok(true)
}

async fn payment_failed(storage: &Arc<dyn Storage>, intent_id: &str, reason: &str) -> Result<bool> {
    if !storage.fail_payment(intent_id, reason).await? {
        return Ok(false);
    }
    warn!("Payment {} failed: {}", intent_id, reason);

    if let Some(payment) = storage.get_payment_by_provider_id(intent_id).await?
        && let Some(user) = storage.get_user_by_id(payment.user_id).await?
    {
        let notice = Notice::new(
            NotificationKind::Payment,
            "Payment failed",
            format!("Your payment could not be completed: {reason}"),
        )
        .with_reference(payment.id);
        NotificationDispatcher::from_config(storage.clone())
            .notify_user(&user, &notice, &DeliveryPolicy::Only(Vec::new()))
            .await;
    }
    Ok(true)
}

async fn subscription_deleted(storage: &Arc<dyn Storage>, user_id: Option<&str>) -> Result<bool> {
    let Some(user_id) = user_id.and_then(|id| id.parse::<i64>().ok()) else {
        warn!("Subscription deletion event without a user id");
        return Ok(false);
    };
    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(false);
    };
    if user.subscription.status == SubscriptionStatus::Cancelled {
        return Ok(false);
    }

    storage
        .update_user_subscription(
            user.id,
            SubscriptionUpdate {
                plan_id: None,
                status: SubscriptionStatus::Cancelled,
                ends_at: user.subscription.ends_at.map(|t| t.timestamp()),
            },
        )
        .await?;
    info!("Subscription cancelled for user {}", user.id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parsing() {
        let body = r#"{
            "id": "evt_1",
            "type": "payment_intent.payment_failed",
            "data": {"object": {
                "id": "pi_123",
                "metadata": {"userId": "42", "planId": "parent_public_monthly"},
                "last_payment_error": {"message": "Card declined"}
            }}
        }"#;
        let event: StripeEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event_type, "payment_intent.payment_failed");
        assert_eq!(event.data.object.id, "pi_123");
        assert_eq!(event.data.object.metadata.user_id.as_deref(), Some("42"));
        assert_eq!(
            event.data.object.last_payment_error.unwrap().message.as_deref(),
            Some("Card declined")
        );
    }

    #[test]
    fn test_unknown_object_shape_still_parses() {
        let body = r#"{"type": "invoice.paid", "data": {"object": {"amount_paid": 100}}}"#;
        let event: StripeEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.data.object.id, "");
        assert!(event.data.object.metadata.user_id.is_none());
    }
}
