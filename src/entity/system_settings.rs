//! 运行时可调整的全局设置，主键为点分配置键（如 `upload.max_size`）

use sea_orm::entity::prelude::*;

use crate::models::system::entities::{SettingValueType, SystemSetting};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub description: Option<String>,
    pub updated_at: i64,
    pub updated_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::system_settings_audit::Entity")]
    Audits,
}

impl Related<super::system_settings_audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_setting(self) -> SystemSetting {
        SystemSetting {
            value_type: self.value_type.parse().unwrap_or(SettingValueType::String),
            updated_at: super::to_datetime(self.updated_at),
            key: self.key,
            value: self.value,
            description: self.description,
            updated_by: self.updated_by,
        }
    }
}
