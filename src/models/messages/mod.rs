use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::common::PaginationQuery;
use crate::models::notifications::ChannelKind;

define_string_enum! {
    /// 收件人范围
    #[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
    pub enum RecipientType {
        Individual => "individual",
        Class => "class",
        AllTeachers => "all_teachers",
        AllParents => "all_parents",
        AllStudents => "all_students",
        All => "all",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
    pub enum MessagePriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

// 消息实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct Message {
    pub id: i64,
    pub school_id: Option<i64>,
    pub sender_id: i64,
    pub recipient_type: RecipientType,
    pub subject: String,
    pub content: String,
    pub category: String,
    pub priority: MessagePriority,
    pub recipient_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 收件箱条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct InboxItem {
    pub recipient_id: i64,
    pub message: Message,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_priority() -> MessagePriority {
    MessagePriority::Normal
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageRequest {
    pub recipient_type: RecipientType,
    #[serde(default)]
    pub recipient_ids: Vec<i64>,
    pub class_id: Option<i64>,
    pub subject: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: MessagePriority,
    /// 额外的站外通道（站内始终投递）
    #[serde(default)]
    pub channels: Vec<ChannelKind>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct MessageListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: bool,
}

/// 存储层新增消息
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub school_id: Option<i64>,
    pub sender_id: i64,
    pub recipient_type: RecipientType,
    pub subject: String,
    pub content: String,
    pub category: String,
    pub priority: MessagePriority,
    pub recipient_ids: Vec<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageResponse {
    pub message: Message,
    pub delivered_to: usize,
}
