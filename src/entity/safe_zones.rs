//! 安全区域实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "safe_zones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by: i64,
    pub device_id: Option<i64>,
    pub school_id: Option<i64>,
    pub name: String,
    pub zone_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
    pub allowed_time_start: Option<String>,
    pub allowed_time_end: Option<String>,
    pub allowed_days: String,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_zone(self) -> crate::models::geolocation::SafeZone {
        use crate::models::geolocation::{SafeZone, ZoneType};

        SafeZone {
            id: self.id,
            created_by: self.created_by,
            device_id: self.device_id,
            school_id: self.school_id,
            name: self.name,
            zone_type: self
                .zone_type
                .parse::<ZoneType>()
                .unwrap_or(ZoneType::Home),
            latitude: self.latitude,
            longitude: self.longitude,
            radius_m: self.radius_m,
            notify_on_entry: self.notify_on_entry,
            notify_on_exit: self.notify_on_exit,
            allowed_time_start: self.allowed_time_start,
            allowed_time_end: self.allowed_time_end,
            allowed_days: super::from_json_list(&self.allowed_days),
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
