//! Stripe 客户端与回调签名校验
//!
//! 只用到 PaymentIntent 创建接口；回调签名头格式为 `t=<unix>,v1=<hex>`，
//! 签名内容为 `"{t}.{body}"` 的 HMAC-SHA256。

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::warn;

use crate::config::StripeConfig;
use crate::errors::{EducafricError, Result};
use crate::services::notifications::providers::build_http_client;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Deserialize)]
pub struct StripeIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

pub struct StripeClient {
    config: StripeConfig,
    client: reqwest::Client,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        let client = build_http_client(config.request_timeout);
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.is_empty()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// 创建 PaymentIntent；XAF 无小数位，金额直接作为最小单位
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        user_id: i64,
        plan_id: &str,
    ) -> Result<StripeIntent> {
        if !self.is_configured() {
            return Err(EducafricError::external_service(
                "Payment provider is not configured",
            ));
        }

        let url = format!(
            "{}/v1/payment_intents",
            self.config.api_url.trim_end_matches('/')
        );
        let form = [
            ("amount", amount.to_string()),
            ("currency", self.config.currency.to_lowercase()),
            ("metadata[userId]", user_id.to_string()),
            ("metadata[planId]", plan_id.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| status.to_string());
            warn!("Stripe payment intent creation failed: {}", detail);
            return Err(EducafricError::external_service(format!(
                "Payment provider rejected the request: {detail}"
            )));
        }

        Ok(response.json::<StripeIntent>().await?)
    }
}

/// 签名校验失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    MissingSecret,
    MalformedHeader,
    TimestampOutOfTolerance,
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SignatureError::MissingSecret => "webhook secret is not configured",
            SignatureError::MalformedHeader => "malformed signature header",
            SignatureError::TimestampOutOfTolerance => "timestamp outside tolerance",
            SignatureError::Mismatch => "no matching signature",
        };
        f.write_str(text)
    }
}

/// 计算 `v1` 签名（十六进制）
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// 校验回调签名；头中可以有多个 `v1`，任一匹配即可
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> std::result::Result<(), SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }

    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::MissingSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    // verify_slice 为常数时间比较
    let matched = signatures.iter().any(|sig| {
        hex::decode(sig)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;

    #[test]
    fn test_valid_signature() {
        let sig = compute_signature(SECRET, 1_700_000_000, BODY);
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_signature(BODY, &header, SECRET, 300, 1_700_000_100),
            Ok(())
        );
    }

    #[test]
    fn test_any_v1_may_match() {
        let sig = compute_signature(SECRET, 1_700_000_000, BODY);
        let header = format!("t=1700000000,v1=deadbeef,v0=abc,v1={sig}");
        assert!(verify_signature(BODY, &header, SECRET, 300, 1_700_000_000).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let sig = compute_signature(SECRET, 1_700_000_000, BODY);
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_signature(b"{}", &header, SECRET, 300, 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_old_timestamp_rejected() {
        let sig = compute_signature(SECRET, 1_700_000_000, BODY);
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_signature(BODY, &header, SECRET, 300, 1_700_000_301),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(
            verify_signature(BODY, "v1=abc", SECRET, 300, 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_signature(BODY, "t=12", SECRET, 300, 12),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_signature(BODY, "t=12,v1=00", "", 300, 12),
            Err(SignatureError::MissingSecret)
        );
    }
}
