//! 第三方 HTTP 接口（短信、Stripe）对接测试，使用 wiremock 模拟

use educafric::config::{SmsConfig, StripeConfig};
use educafric::models::notifications::{ChannelKind, DeliveryStatus};
use educafric::models::users::{
    NotificationPreferences, Subscription, SubscriptionStatus, User, UserRole, UserStatus,
};
use educafric::services::notifications::providers::{
    NotificationChannel, OutboundMessage, SmsChannel,
};
use educafric::services::payments::stripe::StripeClient;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parent(phone: Option<&str>) -> User {
    User {
        id: 12,
        email: "parent@example.cm".to_string(),
        password_hash: String::new(),
        first_name: "Clarisse".to_string(),
        last_name: "Ebode".to_string(),
        role: UserRole::Parent,
        secondary_roles: vec![],
        active_role: UserRole::Parent,
        status: UserStatus::Active,
        school_id: Some(1),
        phone: phone.map(str::to_string),
        whatsapp_number: None,
        preferred_language: "fr".to_string(),
        notifications: NotificationPreferences::default(),
        subscription: Subscription {
            plan_id: None,
            status: SubscriptionStatus::None,
            ends_at: None,
        },
        is_test_account: false,
        last_login: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn sms_channel(api_url: String) -> SmsChannel {
    SmsChannel::new(
        SmsConfig {
            enabled: true,
            api_url,
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            sender: "EDUCAFRIC".to_string(),
        },
        reqwest::Client::new(),
    )
}

fn absence() -> OutboundMessage {
    OutboundMessage {
        title: "Absence".to_string(),
        content: "Junior was absent this morning".to_string(),
    }
}

#[tokio::test]
async fn sms_is_sent_through_vonage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("from=EDUCAFRIC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"status": "0", "message-id": "msg-1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = sms_channel(server.uri())
        .send(&parent(Some("+237670000001")), &absence())
        .await;
    assert_eq!(delivery.channel, ChannelKind::Sms);
    assert_eq!(delivery.status, DeliveryStatus::Sent);
    assert_eq!(delivery.detail.as_deref(), Some("msg-1"));
}

#[tokio::test]
async fn sms_provider_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"status": "4", "error-text": "Bad Credentials"}]
        })))
        .mount(&server)
        .await;

    let delivery = sms_channel(server.uri())
        .send(&parent(Some("+237670000001")), &absence())
        .await;
    assert_eq!(delivery.status, DeliveryStatus::Failed);
    assert_eq!(delivery.detail.as_deref(), Some("Bad Credentials"));
}

#[tokio::test]
async fn sms_without_phone_is_skipped() {
    // 未挂载任何 mock，若发出请求会收到 404
    let server = MockServer::start().await;
    let delivery = sms_channel(server.uri()).send(&parent(None), &absence()).await;
    assert_eq!(delivery.status, DeliveryStatus::Skipped);
}

fn stripe(api_url: String) -> StripeClient {
    StripeClient::new(StripeConfig {
        api_url,
        secret_key: "sk_test_123".to_string(),
        webhook_secret: String::new(),
        currency: "XAF".to_string(),
        webhook_tolerance: 300,
        request_timeout: 5,
    })
}

#[tokio::test]
async fn stripe_payment_intent_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_string_contains("amount=75000"))
        .and(body_string_contains("currency=xaf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_3",
            "client_secret": "pi_3_secret_abc",
            "status": "requires_payment_method"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let intent = stripe(server.uri())
        .create_payment_intent(75000, 7, "school_private")
        .await
        .expect("payment intent");
    assert_eq!(intent.id, "pi_3");
    assert_eq!(intent.client_secret, "pi_3_secret_abc");
}

#[tokio::test]
async fn stripe_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {"message": "Your card was declined."}
        })))
        .mount(&server)
        .await;

    let err = stripe(server.uri())
        .create_payment_intent(1000, 7, "parent_public_monthly")
        .await
        .unwrap_err();
    assert!(err.message().contains("Your card was declined."));
}

#[tokio::test]
async fn stripe_requires_a_secret_key() {
    let mut client_config = StripeConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        secret_key: String::new(),
        webhook_secret: String::new(),
        currency: "XAF".to_string(),
        webhook_tolerance: 300,
        request_timeout: 1,
    };
    assert!(!StripeClient::new(client_config.clone()).is_configured());
    client_config.secret_key = "sk".to_string();
    assert!(StripeClient::new(client_config).is_configured());
}
