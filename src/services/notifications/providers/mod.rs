//! 站外通知通道
//!
//! 每个通道是对第三方 HTTP API 的薄封装，发送结果统一为 `ChannelDelivery`，
//! 失败只记录在投递结果里，不向调用方传播。

mod email;
mod sms;
mod whatsapp;

pub use email::EmailChannel;
pub use sms::SmsChannel;
pub use whatsapp::WhatsAppChannel;

use std::time::Duration;

use async_trait::async_trait;

use crate::models::notifications::{ChannelDelivery, ChannelKind, DeliveryStatus};
use crate::models::users::User;

/// 一条待投递的消息
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub title: String,
    pub content: String,
}

impl OutboundMessage {
    /// 短信与 WhatsApp 使用的纯文本
    pub fn as_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// 通道是否已启用并配置完整
    fn is_available(&self) -> bool;

    async fn send(&self, recipient: &User, message: &OutboundMessage) -> ChannelDelivery;
}

/// 带超时的 HTTP 客户端
pub fn build_http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        })
}

pub(crate) fn delivery(
    channel: ChannelKind,
    status: DeliveryStatus,
    detail: impl Into<Option<String>>,
) -> ChannelDelivery {
    ChannelDelivery {
        channel,
        status,
        detail: detail.into(),
    }
}
