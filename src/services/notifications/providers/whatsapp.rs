//! WhatsApp Cloud API

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{NotificationChannel, OutboundMessage, delivery};
use crate::config::WhatsAppConfig;
use crate::models::notifications::{ChannelDelivery, ChannelKind, DeliveryStatus};
use crate::models::users::User;
use crate::utils::validate::normalize_phone;

pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WhatsApp
    }

    fn is_available(&self) -> bool {
        self.config.enabled
            && !self.config.access_token.is_empty()
            && !self.config.phone_number_id.is_empty()
    }

    async fn send(&self, recipient: &User, message: &OutboundMessage) -> ChannelDelivery {
        if !self.is_available() {
            return delivery(
                ChannelKind::WhatsApp,
                DeliveryStatus::Skipped,
                "whatsapp disabled".to_string(),
            );
        }
        // 优先使用单独登记的 WhatsApp 号码
        let number = recipient
            .whatsapp_number
            .as_deref()
            .or(recipient.phone.as_deref())
            .filter(|p| !p.trim().is_empty());
        let Some(number) = number else {
            return delivery(
                ChannelKind::WhatsApp,
                DeliveryStatus::Skipped,
                "no whatsapp number".to_string(),
            );
        };

        let url = format!(
            "{}/{}/messages",
            self.config.api_url.trim_end_matches('/'),
            self.config.phone_number_id
        );
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": normalize_phone(number).trim_start_matches('+'),
            "type": "text",
            "text": { "body": message.as_text() },
        });

        match self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => {
                let id = r
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v["messages"][0]["id"].as_str().map(|s| s.to_string()));
                delivery(ChannelKind::WhatsApp, DeliveryStatus::Sent, id)
            }
            Ok(r) => {
                let status = r.status();
                warn!("WhatsApp API returned HTTP {} for user {}", status, recipient.id);
                delivery(
                    ChannelKind::WhatsApp,
                    DeliveryStatus::Failed,
                    format!("HTTP {status}"),
                )
            }
            Err(e) => {
                warn!("WhatsApp request to user {} failed: {}", recipient.id, e);
                delivery(ChannelKind::WhatsApp, DeliveryStatus::Failed, e.to_string())
            }
        }
    }
}
