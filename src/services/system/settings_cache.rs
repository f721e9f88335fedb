//! 动态配置
//!
//! 启动时从 `system_settings` 表载入，管理员修改后即时生效；
//! 表中没有的键回退到 `config.toml` 的取值。

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::system::KnownSettingKey;

static OVERRIDES: Lazy<RwLock<HashMap<KnownSettingKey, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub struct DynamicConfig;

impl DynamicConfig {
    /// 用数据库中的设置整体替换当前覆盖值，未知键忽略
    pub async fn init(settings: Vec<(String, String)>) {
        let mut overrides = OVERRIDES.write().await;
        overrides.clear();
        for (key, value) in settings {
            match KnownSettingKey::from_str(&key) {
                Ok(known) => {
                    overrides.insert(known, value);
                }
                Err(_) => warn!("Ignoring unknown setting {}", key),
            }
        }
        info!("Loaded {} dynamic settings", overrides.len());
    }

    pub async fn update(key: &str, value: &str) {
        let Ok(known) = KnownSettingKey::from_str(key) else {
            return;
        };
        OVERRIDES.write().await.insert(known, value.to_string());
        debug!("Dynamic setting {} = {}", key, value);
    }

    async fn raw(key: KnownSettingKey) -> Option<String> {
        OVERRIDES.read().await.get(&key).cloned()
    }

    /// 覆盖值解析失败时视为未设置
    async fn parsed<T: FromStr>(key: KnownSettingKey) -> Option<T> {
        Self::raw(key).await.and_then(|v| v.trim().parse().ok())
    }

    pub async fn system_name() -> String {
        Self::raw(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 分钟
    pub async fn access_token_expiry() -> i64 {
        Self::parsed(KnownSettingKey::AccessTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.access_token_expiry)
    }

    /// 天
    pub async fn refresh_token_remember_me_expiry() -> i64 {
        Self::parsed(KnownSettingKey::RefreshTokenRememberMeExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_remember_me_expiry)
    }

    /// 字节
    pub async fn upload_max_size() -> usize {
        Self::parsed(KnownSettingKey::UploadMaxSize)
            .await
            .unwrap_or(AppConfig::get().upload.max_size)
    }

    pub async fn upload_allowed_types() -> Vec<String> {
        Self::raw(KnownSettingKey::UploadAllowedTypes)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
            .unwrap_or_else(|| AppConfig::get().upload.allowed_types.clone())
    }

    pub async fn speed_limit_kmh() -> f64 {
        Self::parsed(KnownSettingKey::SpeedLimitKmh)
            .await
            .unwrap_or(AppConfig::get().geolocation.speed_limit_kmh)
    }

    /// 百分比
    pub async fn low_battery_threshold() -> i32 {
        Self::parsed(KnownSettingKey::LowBatteryThreshold)
            .await
            .unwrap_or(AppConfig::get().geolocation.low_battery_threshold)
    }

    pub async fn bulletin_batch_size() -> usize {
        Self::parsed::<usize>(KnownSettingKey::BulletinBatchSize)
            .await
            .filter(|v| *v > 0)
            .unwrap_or_else(|| AppConfig::get().bulletin.batch_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overrides_and_fallbacks() {
        DynamicConfig::init(vec![
            ("geolocation.speed_limit_kmh".to_string(), "45".to_string()),
            ("bulletin.batch_size".to_string(), "0".to_string()),
            ("cors.max_age".to_string(), "60".to_string()),
        ])
        .await;
        assert_eq!(DynamicConfig::speed_limit_kmh().await, 45.0);
        // 非法的 0 回退到配置文件
        assert!(DynamicConfig::bulletin_batch_size().await >= 1);

        DynamicConfig::update("upload.allowed_types", r#"[".pdf"]"#).await;
        assert_eq!(DynamicConfig::upload_allowed_types().await, vec![".pdf"]);
    }
}
