//! Vonage (Nexmo) 短信

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{NotificationChannel, OutboundMessage, delivery};
use crate::config::SmsConfig;
use crate::models::notifications::{ChannelDelivery, ChannelKind, DeliveryStatus};
use crate::models::users::User;
use crate::utils::validate::normalize_phone;

#[derive(Debug, Deserialize)]
struct VonageResponse {
    #[serde(default)]
    messages: Vec<VonageMessageStatus>,
}

#[derive(Debug, Deserialize)]
struct VonageMessageStatus {
    status: String,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

pub struct SmsChannel {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsChannel {
    pub fn new(config: SmsConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn is_available(&self) -> bool {
        self.config.enabled && !self.config.api_key.is_empty() && !self.config.api_secret.is_empty()
    }

    async fn send(&self, recipient: &User, message: &OutboundMessage) -> ChannelDelivery {
        if !self.is_available() {
            return delivery(ChannelKind::Sms, DeliveryStatus::Skipped, "sms disabled".to_string());
        }
        let Some(phone) = recipient.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            return delivery(ChannelKind::Sms, DeliveryStatus::Skipped, "no phone number".to_string());
        };
        // Vonage 要求不带 + 的国际号码
        let to = normalize_phone(phone).trim_start_matches('+').to_string();
        let text = message.as_text();

        let url = format!("{}/sms/json", self.config.api_url.trim_end_matches('/'));
        let params = [
            ("api_key", self.config.api_key.as_str()),
            ("api_secret", self.config.api_secret.as_str()),
            ("from", self.config.sender.as_str()),
            ("to", to.as_str()),
            ("text", text.as_str()),
        ];

        let response = match self.client.post(&url).form(&params).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("SMS request to user {} failed: {}", recipient.id, e);
                return delivery(ChannelKind::Sms, DeliveryStatus::Failed, e.to_string());
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!("SMS provider returned HTTP {} for user {}", status, recipient.id);
            return delivery(
                ChannelKind::Sms,
                DeliveryStatus::Failed,
                format!("HTTP {status}"),
            );
        }

        match response.json::<VonageResponse>().await {
            Ok(body) => match body.messages.first() {
                Some(m) if m.status == "0" => {
                    debug!("SMS sent to user {} ({:?})", recipient.id, m.message_id);
                    delivery(ChannelKind::Sms, DeliveryStatus::Sent, m.message_id.clone())
                }
                Some(m) => delivery(
                    ChannelKind::Sms,
                    DeliveryStatus::Failed,
                    m.error_text
                        .clone()
                        .unwrap_or_else(|| format!("status {}", m.status)),
                ),
                None => delivery(
                    ChannelKind::Sms,
                    DeliveryStatus::Failed,
                    "empty provider response".to_string(),
                ),
            },
            Err(e) => delivery(ChannelKind::Sms, DeliveryStatus::Failed, e.to_string()),
        }
    }
}
