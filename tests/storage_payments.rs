mod common;

use educafric::models::payments::{NewPayment, PaymentStatus};
use educafric::models::schools::UpdateSchoolRequest;
use educafric::models::users::{SubscriptionStatus, SubscriptionUpdate, UserRole};

fn activation(ends_at: i64) -> SubscriptionUpdate {
    SubscriptionUpdate {
        plan_id: Some("school_premium_yearly".to_string()),
        status: SubscriptionStatus::Active,
        ends_at: Some(ends_at),
    }
}

fn pending(user_id: i64, intent: &str) -> NewPayment {
    NewPayment {
        user_id,
        school_id: None,
        plan_id: "parent_public_monthly".to_string(),
        amount: 1000,
        currency: "XAF".to_string(),
        provider: "stripe".to_string(),
        provider_payment_id: intent.to_string(),
    }
}

#[tokio::test]
async fn completing_a_payment_is_idempotent() {
    let storage = common::memory_storage().await;
    let parent = common::user(&storage, "payer@example.cm", UserRole::Parent, None).await;
    storage.create_payment(pending(parent.id, "pi_done")).await.unwrap();

    assert!(storage.complete_payment("pi_done", None).await.unwrap());
    // 重复投递的回调不再生效
    assert!(!storage.complete_payment("pi_done", None).await.unwrap());
    assert!(!storage.fail_payment("pi_done", "late failure").await.unwrap());

    let payment = storage
        .get_payment_by_provider_id("pi_done")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.completed_at.is_some());
    assert!(payment.failure_reason.is_none());
}

#[tokio::test]
async fn failed_payment_keeps_reason() {
    let storage = common::memory_storage().await;
    let parent = common::user(&storage, "declined@example.cm", UserRole::Parent, None).await;
    storage.create_payment(pending(parent.id, "pi_fail")).await.unwrap();

    assert!(storage.fail_payment("pi_fail", "Card declined").await.unwrap());
    assert!(!storage.complete_payment("pi_fail", None).await.unwrap());

    let payment = storage
        .get_payment_by_provider_id("pi_fail")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(payment.failure_reason.as_deref(), Some("Card declined"));
}

#[tokio::test]
async fn unknown_intent_is_ignored() {
    let storage = common::memory_storage().await;
    assert!(!storage.complete_payment("pi_missing", None).await.unwrap());
    assert!(storage.get_payment_by_provider_id("pi_missing").await.unwrap().is_none());
}

#[tokio::test]
async fn completion_activates_payer_and_school_together() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Collège Bilingue de Bonabéri").await;
    let director = common::user(&storage, "dir@bonaberi.cm", UserRole::Director, Some(school.id)).await;
    let mut payment = pending(director.id, "pi_school");
    payment.school_id = Some(school.id);
    storage.create_payment(payment).await.unwrap();

    let ends_at = chrono::Utc::now().timestamp() + 86_400 * 365;
    assert!(storage.complete_payment("pi_school", Some(activation(ends_at))).await.unwrap());

    let director = storage.get_user_by_id(director.id).await.unwrap().unwrap();
    assert_eq!(director.subscription.status, SubscriptionStatus::Active);
    assert_eq!(director.subscription.plan_id.as_deref(), Some("school_premium_yearly"));
    let school = storage.get_school_by_id(school.id).await.unwrap().unwrap();
    assert_eq!(school.subscription_status, SubscriptionStatus::Active);
    assert_eq!(school.subscription_ends_at.map(|t| t.timestamp()), Some(ends_at));

    // 重投不重复开通
    assert!(!storage.complete_payment("pi_school", Some(activation(ends_at))).await.unwrap());
}

#[tokio::test]
async fn failed_activation_leaves_payment_pending_for_redelivery() {
    let storage = common::memory_storage().await;
    let parent = common::user(&storage, "retry@example.cm", UserRole::Parent, None).await;
    let mut payment = pending(parent.id, "pi_retry");
    payment.school_id = Some(9_999);
    storage.create_payment(payment).await.unwrap();

    let ends_at = chrono::Utc::now().timestamp() + 3_600;
    assert!(storage.complete_payment("pi_retry", Some(activation(ends_at))).await.is_err());

    let payment = storage.get_payment_by_provider_id("pi_retry").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.completed_at.is_none());
    let parent = storage.get_user_by_id(parent.id).await.unwrap().unwrap();
    assert_eq!(parent.subscription.status, SubscriptionStatus::None);
}

#[tokio::test]
async fn lapsed_subscriptions_are_not_counted_as_active() {
    let storage = common::memory_storage().await;
    let now = chrono::Utc::now().timestamp();
    let current = common::user(&storage, "current@example.cm", UserRole::Parent, None).await;
    let lapsed = common::user(&storage, "lapsed@example.cm", UserRole::Parent, None).await;
    storage
        .update_user_subscription(current.id, activation(now + 86_400))
        .await
        .unwrap();
    storage
        .update_user_subscription(lapsed.id, activation(now - 86_400))
        .await
        .unwrap();

    assert_eq!(storage.count_active_subscriptions().await.unwrap(), 1);
    let lapsed = storage.get_user_by_id(lapsed.id).await.unwrap().unwrap();
    assert_eq!(lapsed.subscription.status, SubscriptionStatus::Expired);

    // 手工开通的学校订阅不限期
    let school = common::school(&storage, "École Publique de Mvog-Ada").await;
    storage
        .update_school(
            school.id,
            UpdateSchoolRequest {
                subscription_status: Some(SubscriptionStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(storage.count_active_subscriptions().await.unwrap(), 2);
}
