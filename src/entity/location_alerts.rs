//! 位置告警实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "location_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub device_id: i64,
    pub student_id: i64,
    pub zone_id: Option<i64>,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_resolved: bool,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_alert(self) -> crate::models::geolocation::LocationAlert {
        use crate::models::geolocation::{AlertSeverity, AlertType, LocationAlert};

        LocationAlert {
            id: self.id,
            device_id: self.device_id,
            student_id: self.student_id,
            zone_id: self.zone_id,
            alert_type: self
                .alert_type
                .parse::<AlertType>()
                .unwrap_or(AlertType::Panic),
            severity: self
                .severity
                .parse::<AlertSeverity>()
                .unwrap_or(AlertSeverity::Warning),
            message: self.message,
            latitude: self.latitude,
            longitude: self.longitude,
            is_resolved: self.is_resolved,
            resolved_by: self.resolved_by,
            resolved_at: super::to_datetime_opt(self.resolved_at),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
