//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub academic_year: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_term(self) -> crate::models::schools::entities::Term {
        crate::models::schools::entities::Term {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            academic_year: self.academic_year,
            start_date: super::to_date(&self.start_date),
            end_date: super::to_date(&self.end_date),
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
