//! 通知分发
//!
//! 站内通知总是写入；站外通道按投递策略与用户偏好筛选。
//! 多个收件人并发处理，并发数受 `notifications.max_concurrency` 限制。

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::providers::{
    EmailChannel, NotificationChannel, OutboundMessage, SmsChannel, WhatsAppChannel,
    build_http_client,
};
use crate::config::AppConfig;
use crate::models::notifications::{
    ChannelDelivery, ChannelKind, DeliveryStatus, NewNotification, NotificationKind,
};
use crate::models::users::User;
use crate::storage::Storage;

/// 短信、WhatsApp 与邮件通道，进程内共用一个 HTTP 连接池
static CONFIGURED_CHANNELS: Lazy<Vec<Arc<dyn NotificationChannel>>> = Lazy::new(|| {
    let config = &AppConfig::get().notifications;
    let client = build_http_client(config.request_timeout);
    vec![
        Arc::new(SmsChannel::new(config.sms.clone(), client.clone())),
        Arc::new(WhatsAppChannel::new(config.whatsapp.clone(), client)),
        Arc::new(EmailChannel::new(config.email.clone())),
    ]
});

fn configured_channels() -> Vec<Arc<dyn NotificationChannel>> {
    CONFIGURED_CHANNELS.clone()
}

/// 一条通知的内容
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub reference_id: Option<i64>,
}

impl Notice {
    pub fn new(kind: NotificationKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            reference_id: None,
        }
    }

    pub fn with_reference(mut self, reference_id: i64) -> Self {
        self.reference_id = Some(reference_id);
        self
    }
}

/// 站外通道的选择方式
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryPolicy {
    /// 按用户偏好
    Preferences,
    /// 仅限指定通道，且用户偏好允许
    Only(Vec<ChannelKind>),
    /// 紧急情况：所有可用通道，忽略偏好
    Urgent,
}

impl DeliveryPolicy {
    fn wants(&self, channel: ChannelKind, user: &User) -> bool {
        let preferred = match channel {
            ChannelKind::App => true,
            ChannelKind::Sms => user.notifications.sms,
            ChannelKind::WhatsApp => user.notifications.whatsapp,
            ChannelKind::Email => user.notifications.email,
        };
        match self {
            DeliveryPolicy::Preferences => preferred,
            DeliveryPolicy::Only(channels) => preferred && channels.contains(&channel),
            DeliveryPolicy::Urgent => true,
        }
    }
}

pub struct NotificationDispatcher {
    storage: Arc<dyn Storage>,
    channels: Vec<Arc<dyn NotificationChannel>>,
    max_concurrency: usize,
}

impl NotificationDispatcher {
    pub fn new(
        storage: Arc<dyn Storage>,
        channels: Vec<Arc<dyn NotificationChannel>>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            storage,
            channels,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// 使用按全局配置组装的共享通道
    pub fn from_config(storage: Arc<dyn Storage>) -> Self {
        Self::new(
            storage,
            configured_channels(),
            AppConfig::get().notifications.max_concurrency,
        )
    }

    /// 给单个用户发送通知，返回各通道投递结果
    pub async fn notify_user(
        &self,
        user: &User,
        notice: &Notice,
        policy: &DeliveryPolicy,
    ) -> Vec<ChannelDelivery> {
        let message = OutboundMessage {
            title: notice.title.clone(),
            content: notice.content.clone(),
        };

        let mut deliveries = vec![ChannelDelivery {
            channel: ChannelKind::App,
            status: DeliveryStatus::Sent,
            detail: None,
        }];
        for channel in &self.channels {
            if !policy.wants(channel.kind(), user) {
                continue;
            }
            deliveries.push(channel.send(user, &message).await);
        }

        let record = NewNotification {
            user_id: user.id,
            kind: notice.kind,
            title: notice.title.clone(),
            content: notice.content.clone(),
            reference_id: notice.reference_id,
            deliveries: deliveries.clone(),
        };
        if let Err(e) = self.storage.create_notification(record).await {
            warn!("Failed to store notification for user {}: {}", user.id, e);
        }

        deliveries
    }

    /// 并发通知多个用户，返回处理的用户数
    pub async fn notify_users(
        &self,
        users: &[User],
        notice: &Notice,
        policy: &DeliveryPolicy,
    ) -> usize {
        let count = stream::iter(users.iter())
            .map(|user| self.notify_user(user, notice, policy))
            .buffer_unordered(self.max_concurrency)
            .count()
            .await;
        debug!(
            "Notification '{}' dispatched to {} user(s)",
            notice.title, count
        );
        count
    }

    /// 通知多名学生的家长，同一家长只通知一次
    pub async fn notify_parents_of_students(
        &self,
        student_ids: &[i64],
        notice: &Notice,
        policy: &DeliveryPolicy,
    ) -> usize {
        let mut parents: Vec<User> = Vec::new();
        for student_id in student_ids {
            match self.storage.list_parents_of_student(*student_id).await {
                Ok(found) => {
                    for parent in found {
                        if !parents.iter().any(|p| p.id == parent.id) {
                            parents.push(parent);
                        }
                    }
                }
                Err(e) => warn!("Failed to load parents of student {}: {}", student_id, e),
            }
        }
        self.notify_users(&parents, notice, policy).await
    }

    /// 通知学生的所有关联家长
    pub async fn notify_parents_of(
        &self,
        student_id: i64,
        notice: &Notice,
        policy: &DeliveryPolicy,
    ) -> usize {
        match self.storage.list_parents_of_student(student_id).await {
            Ok(parents) => self.notify_users(&parents, notice, policy).await,
            Err(e) => {
                warn!("Failed to load parents of student {}: {}", student_id, e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        NotificationPreferences, Subscription, SubscriptionStatus, UserRole, UserStatus,
    };

    fn parent(sms: bool, whatsapp: bool) -> User {
        User {
            id: 1,
            email: "parent@example.cm".to_string(),
            password_hash: String::new(),
            first_name: "Paul".to_string(),
            last_name: "Mbida".to_string(),
            role: UserRole::Parent,
            secondary_roles: vec![],
            active_role: UserRole::Parent,
            status: UserStatus::Active,
            school_id: Some(1),
            phone: Some("+237699000000".to_string()),
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            notifications: NotificationPreferences {
                sms,
                whatsapp,
                email: false,
            },
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

    #[test]
    fn test_policy_respects_preferences() {
        let user = parent(true, false);
        assert!(DeliveryPolicy::Preferences.wants(ChannelKind::Sms, &user));
        assert!(!DeliveryPolicy::Preferences.wants(ChannelKind::WhatsApp, &user));
        assert!(!DeliveryPolicy::Preferences.wants(ChannelKind::Email, &user));
    }

    #[test]
    fn test_only_policy_intersects_with_preferences() {
        let user = parent(true, true);
        let policy = DeliveryPolicy::Only(vec![ChannelKind::WhatsApp]);
        assert!(policy.wants(ChannelKind::WhatsApp, &user));
        assert!(!policy.wants(ChannelKind::Sms, &user));

        let user = parent(false, false);
        assert!(!policy.wants(ChannelKind::WhatsApp, &user));
    }

    #[test]
    fn test_channels_are_built_once() {
        let first = configured_channels();
        let second = configured_channels();
        assert_eq!(first.len(), 3);
        assert!(
            first
                .iter()
                .zip(&second)
                .all(|(a, b)| Arc::ptr_eq(a, b))
        );
    }

    #[test]
    fn test_urgent_policy_ignores_preferences() {
        let user = parent(false, false);
        assert!(DeliveryPolicy::Urgent.wants(ChannelKind::Sms, &user));
        assert!(DeliveryPolicy::Urgent.wants(ChannelKind::Email, &user));
    }
}
