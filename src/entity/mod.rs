//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间戳统一存储为 unix 秒，日期存储为 `YYYY-MM-DD` 字符串。

pub mod prelude;

pub mod attendance;
pub mod bulletin_approvals;
pub mod bulletin_grades;
pub mod bulletin_verifications;
pub mod bulletins;
pub mod classes;
pub mod enrollments;
pub mod files;
pub mod grades;
pub mod homework;
pub mod homework_submissions;
pub mod location_alerts;
pub mod message_recipients;
pub mod messages;
pub mod notifications;
pub mod parent_requests;
pub mod parent_student_relations;
pub mod payments;
pub mod safe_zones;
pub mod schools;
pub mod subjects;
pub mod system_settings;
pub mod system_settings_audit;
pub mod terms;
pub mod timetable_slots;
pub mod tracked_devices;
pub mod users;
pub mod zone_status;

use chrono::{DateTime, NaiveDate, Utc};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn to_datetime_opt(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.map(to_datetime)
}

pub(crate) fn to_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_default()
}

pub(crate) fn from_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 解析 JSON 数组列，格式错误时视为空
pub(crate) fn from_json_list<T: serde::de::DeserializeOwned>(value: &str) -> Vec<T> {
    serde_json::from_str(value).unwrap_or_default()
}

pub(crate) fn to_json_list<T: serde::Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
