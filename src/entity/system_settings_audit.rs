//! 设置变更记录，每次管理员修改设置写入一行

use sea_orm::entity::prelude::*;

use crate::models::system::entities::SettingAudit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings_audit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: i64,
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::system_settings::Entity",
        from = "Column::SettingKey",
        to = "super::system_settings::Column::Key"
    )]
    Setting,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChangedBy",
        to = "super::users::Column::Id"
    )]
    ChangedBy,
}

impl Related<super::system_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Setting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit(self) -> SettingAudit {
        SettingAudit {
            changed_at: super::to_datetime(self.changed_at),
            id: self.id,
            setting_key: self.setting_key,
            old_value: self.old_value,
            new_value: self.new_value,
            changed_by: self.changed_by,
            ip_address: self.ip_address,
        }
    }
}
