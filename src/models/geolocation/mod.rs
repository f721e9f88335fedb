use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
    pub enum DeviceType {
        Tablet => "tablet",
        Smartwatch => "smartwatch",
        Phone => "phone",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
    pub enum ZoneType {
        School => "school",
        Home => "home",
        Family => "family",
        Medical => "medical",
        Emergency => "emergency",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
    pub enum AlertType {
        Entry => "entry",
        Exit => "exit",
        UnauthorizedTime => "unauthorized_time",
        SpeedLimit => "speed_limit",
        LowBattery => "low_battery",
        Panic => "panic",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
    pub enum AlertSeverity {
        Info => "info",
        Warning => "warning",
        Critical => "critical",
    }
}

impl AlertType {
    pub fn default_severity(&self) -> AlertSeverity {
        match self {
            Self::Entry => AlertSeverity::Info,
            Self::Exit | Self::LowBattery | Self::UnauthorizedTime => AlertSeverity::Warning,
            Self::SpeedLimit | Self::Panic => AlertSeverity::Critical,
        }
    }
}

// 追踪设备
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct TrackedDevice {
    pub id: i64,
    pub student_id: i64,
    pub registered_by: i64,
    pub school_id: Option<i64>,
    pub device_name: String,
    pub device_type: DeviceType,
    pub imei: Option<String>,
    pub is_active: bool,
    /// 低电量告警已发出，电量回升后复位
    pub low_battery_alerted: bool,
    pub battery_level: Option<i32>,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    pub last_speed_kmh: Option<f64>,
    pub last_seen_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 安全区域：绑定设备或整个学校；allowed_days 取 1..=7（周一为 1），为空表示每天
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct SafeZone {
    pub id: i64,
    pub created_by: i64,
    pub device_id: Option<i64>,
    pub school_id: Option<i64>,
    pub name: String,
    pub zone_type: ZoneType,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
    pub allowed_time_start: Option<String>,
    pub allowed_time_end: Option<String>,
    pub allowed_days: Vec<u32>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 位置告警
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct LocationAlert {
    pub id: i64,
    pub device_id: i64,
    pub student_id: i64,
    pub zone_id: Option<i64>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_resolved: bool,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 设备在某区域内外的持久状态
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneStatus {
    pub device_id: i64,
    pub zone_id: i64,
    pub is_inside: bool,
    /// 本次停留已发出非允许时段告警
    pub schedule_alerted: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct RegisterDeviceRequest {
    pub student_id: i64,
    pub device_type: DeviceType,
    pub device_name: String,
    pub imei: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct CreateSafeZoneRequest {
    pub device_id: Option<i64>,
    pub school_id: Option<i64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub zone_type: ZoneType,
    #[serde(default = "default_true")]
    pub notify_on_entry: bool,
    #[serde(default = "default_true")]
    pub notify_on_exit: bool,
    pub allowed_time_start: Option<String>,
    pub allowed_time_end: Option<String>,
    #[serde(default)]
    pub allowed_days: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct UpdateSafeZoneRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    pub notify_on_entry: Option<bool>,
    pub notify_on_exit: Option<bool>,
    pub allowed_time_start: Option<String>,
    pub allowed_time_end: Option<String>,
    pub allowed_days: Option<Vec<u32>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct ZoneListQuery {
    pub device_id: Option<i64>,
}

/// 设备上报的位置
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct LocationUpdateRequest {
    pub device_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
    pub battery_level: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct PanicRequest {
    pub device_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub panic_type: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct AlertListQuery {
    #[serde(default)]
    pub unresolved_only: bool,
}

/// 存储层新增告警
#[derive(Debug, Clone)]
pub struct NewLocationAlert {
    pub device_id: i64,
    pub student_id: i64,
    pub zone_id: Option<i64>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct LocationUpdateResponse {
    pub device: TrackedDevice,
    pub zones: Vec<ZoneStatusView>,
    pub alerts: Vec<LocationAlert>,
}

/// 单个区域的评估结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct ZoneStatusView {
    pub zone_id: i64,
    pub zone_name: String,
    pub is_inside: bool,
    pub distance_m: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/geolocation.ts")]
pub struct DeviceStatusResponse {
    pub device: TrackedDevice,
    pub zones: Vec<ZoneStatusView>,
    pub unresolved_alerts: u64,
}

/// 区域查询范围：指定设备的区域，或学校的区域
#[derive(Debug, Clone, Default)]
pub struct ZoneFilter {
    pub device_ids: Vec<i64>,
    pub school_id: Option<i64>,
    pub active_only: bool,
}

/// 位置上报后写回设备的字段
#[derive(Debug, Clone)]
pub struct DevicePositionUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: Option<f64>,
    pub battery_level: Option<i32>,
    pub low_battery_alerted: bool,
}
