//! 邮件通道：不连接 SMTP，只记录投递日志

use async_trait::async_trait;
use tracing::info;

use super::{NotificationChannel, OutboundMessage, delivery};
use crate::config::EmailConfig;
use crate::models::notifications::{ChannelDelivery, ChannelKind, DeliveryStatus};
use crate::models::users::User;

pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn is_available(&self) -> bool {
        self.config.enabled
    }

    async fn send(&self, recipient: &User, message: &OutboundMessage) -> ChannelDelivery {
        if !self.is_available() {
            return delivery(
                ChannelKind::Email,
                DeliveryStatus::Skipped,
                "email disabled".to_string(),
            );
        }
        info!(
            from = %self.config.from,
            to = %recipient.email,
            subject = %message.title,
            "Email notification logged"
        );
        delivery(ChannelKind::Email, DeliveryStatus::Sent, "logged".to_string())
    }
}
