//! 追踪设备实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tracked_devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub registered_by: i64,
    pub school_id: Option<i64>,
    pub device_name: String,
    pub device_type: String,
    pub imei: Option<String>,
    pub is_active: bool,
    pub low_battery_alerted: bool,
    pub battery_level: Option<i32>,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    pub last_speed_kmh: Option<f64>,
    pub last_seen_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_device(self) -> crate::models::geolocation::TrackedDevice {
        use crate::models::geolocation::{DeviceType, TrackedDevice};

        TrackedDevice {
            id: self.id,
            student_id: self.student_id,
            registered_by: self.registered_by,
            school_id: self.school_id,
            device_name: self.device_name,
            device_type: self
                .device_type
                .parse::<DeviceType>()
                .unwrap_or(DeviceType::Phone),
            imei: self.imei,
            is_active: self.is_active,
            low_battery_alerted: self.low_battery_alerted,
            battery_level: self.battery_level,
            last_latitude: self.last_latitude,
            last_longitude: self.last_longitude,
            last_speed_kmh: self.last_speed_kmh,
            last_seen_at: super::to_datetime_opt(self.last_seen_at),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
