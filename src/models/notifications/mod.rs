use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::common::PaginationQuery;

define_string_enum! {
    /// 通知通道
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum ChannelKind {
        App => "app",
        Sms => "sms",
        WhatsApp => "whatsapp",
        Email => "email",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum DeliveryStatus {
        Sent => "sent",
        Failed => "failed",
        Skipped => "skipped",
    }
}

define_string_enum! {
    /// 通知类别
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationKind {
        Message => "message",
        Grade => "grade",
        Attendance => "attendance",
        Homework => "homework",
        Bulletin => "bulletin",
        ParentRequest => "parent_request",
        Geolocation => "geolocation",
        Payment => "payment",
        System => "system",
    }
}

/// 单个通道的投递结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct ChannelDelivery {
    pub channel: ChannelKind,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

// 站内通知
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub reference_id: Option<i64>,
    pub deliveries: Vec<ChannelDelivery>,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层新增通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub reference_id: Option<i64>,
    pub deliveries: Vec<ChannelDelivery>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct UpdatePreferencesRequest {
    pub sms: Option<bool>,
    pub whatsapp: Option<bool>,
    pub email: Option<bool>,
    pub whatsapp_number: Option<String>,
    pub preferred_language: Option<String>,
}
