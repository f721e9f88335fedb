use serde::Serialize;
use ts_rs::TS;

use super::entities::{SettingAudit, SystemSetting};
use crate::define_string_enum;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UploadLimits {
    /// 字节
    pub max_size: u64,
    pub allowed_types: Vec<String>,
}

/// 前端启动时读取的公开设置
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct PublicSettingsResponse {
    pub system_name: String,
    pub environment: String,
    pub languages: Vec<String>,
    pub currency: String,
    pub sandbox_enabled: bool,
    pub upload: UploadLimits,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
    pub enum ComponentStatus {
        Ok => "ok",
        Degraded => "degraded",
        Unavailable => "unavailable",
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub database: ComponentStatus,
    pub version: String,
    pub uptime_seconds: i64,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == ComponentStatus::Ok
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingResponse {
    pub setting: SystemSetting,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAuditListResponse {
    pub audits: Vec<SettingAudit>,
    pub pagination: PaginationInfo,
}
