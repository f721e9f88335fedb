//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name_fr: String,
    pub name_en: String,
    pub code: String,
    pub coefficient: f64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::classes::entities::Subject {
        crate::models::classes::entities::Subject {
            id: self.id,
            school_id: self.school_id,
            name_fr: self.name_fr,
            name_en: self.name_en,
            code: self.code,
            coefficient: self.coefficient,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
