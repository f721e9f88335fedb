//! 家长-学生关系实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parent_student_relations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub relationship: String,
    pub is_primary: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_relation(self) -> crate::models::classes::entities::ParentStudentRelation {
        use crate::models::classes::entities::{ParentStudentRelation, RelationshipType};

        ParentStudentRelation {
            id: self.id,
            parent_id: self.parent_id,
            student_id: self.student_id,
            relationship: self
                .relationship
                .parse::<RelationshipType>()
                .unwrap_or(RelationshipType::Guardian),
            is_primary: self.is_primary,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
