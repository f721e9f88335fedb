//! 设备-区域状态实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "zone_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub device_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub zone_id: i64,
    pub is_inside: bool,
    pub schedule_alerted: bool,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_zone_status(self) -> crate::models::geolocation::ZoneStatus {
        crate::models::geolocation::ZoneStatus {
            device_id: self.device_id,
            zone_id: self.zone_id,
            is_inside: self.is_inside,
            schedule_alerted: self.schedule_alerted,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
