use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 配置值类型
    #[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
    pub enum SettingValueType {
        String => "string",
        Integer => "integer",
        Boolean => "boolean",
        JsonArray => "json_array",
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownSettingKey {
    SystemName,
    AccessTokenExpiry,
    RefreshTokenExpiry,
    RefreshTokenRememberMeExpiry,
    UploadMaxSize,
    UploadAllowedTypes,
    SpeedLimitKmh,
    LowBatteryThreshold,
    BulletinBatchSize,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::RefreshTokenExpiry => "jwt.refresh_token_expiry",
            KnownSettingKey::RefreshTokenRememberMeExpiry => "jwt.refresh_token_remember_me_expiry",
            KnownSettingKey::UploadMaxSize => "upload.max_size",
            KnownSettingKey::UploadAllowedTypes => "upload.allowed_types",
            KnownSettingKey::SpeedLimitKmh => "geolocation.speed_limit_kmh",
            KnownSettingKey::LowBatteryThreshold => "geolocation.low_battery_threshold",
            KnownSettingKey::BulletinBatchSize => "bulletin.batch_size",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName => SettingValueType::String,
            KnownSettingKey::UploadAllowedTypes => SettingValueType::JsonArray,
            _ => SettingValueType::Integer,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            KnownSettingKey::SystemName,
            KnownSettingKey::AccessTokenExpiry,
            KnownSettingKey::RefreshTokenExpiry,
            KnownSettingKey::RefreshTokenRememberMeExpiry,
            KnownSettingKey::UploadMaxSize,
            KnownSettingKey::UploadAllowedTypes,
            KnownSettingKey::SpeedLimitKmh,
            KnownSettingKey::LowBatteryThreshold,
            KnownSettingKey::BulletinBatchSize,
        ]
    }

    /// 校验取值是否符合类型以及业务范围
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self.value_type() {
            SettingValueType::String => {
                if value.trim().is_empty() {
                    return Err("Value must not be empty".to_string());
                }
            }
            SettingValueType::Integer => {
                let n: i64 = value
                    .parse()
                    .map_err(|_| format!("Value '{value}' is not an integer"))?;
                if n <= 0 {
                    return Err("Value must be a positive integer".to_string());
                }
                if *self == KnownSettingKey::LowBatteryThreshold && n > 100 {
                    return Err("Battery threshold must be between 1 and 100".to_string());
                }
            }
            SettingValueType::Boolean => {
                value
                    .parse::<bool>()
                    .map_err(|_| format!("Value '{value}' is not a boolean"))?;
            }
            SettingValueType::JsonArray => {
                serde_json::from_str::<Vec<String>>(value)
                    .map_err(|e| format!("Value is not a JSON string array: {e}"))?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::all()
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 设置审计日志实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAudit {
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_known_key_lookup() {
        assert_eq!(
            KnownSettingKey::from_str("geolocation.speed_limit_kmh").unwrap(),
            KnownSettingKey::SpeedLimitKmh
        );
        assert!(KnownSettingKey::from_str("cors.max_age").is_err());
    }

    #[test]
    fn test_setting_validation() {
        assert!(KnownSettingKey::SpeedLimitKmh.validate("60").is_ok());
        assert!(KnownSettingKey::SpeedLimitKmh.validate("-1").is_err());
        assert!(KnownSettingKey::LowBatteryThreshold.validate("150").is_err());
        assert!(KnownSettingKey::UploadAllowedTypes.validate(r#"[".pdf"]"#).is_ok());
        assert!(KnownSettingKey::UploadAllowedTypes.validate("pdf").is_err());
        assert!(KnownSettingKey::SystemName.validate("  ").is_err());
    }
}
