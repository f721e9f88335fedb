//! 成绩单科目成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bulletin_grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bulletin_id: i64,
    pub subject_id: i64,
    pub grade: f64,
    pub coefficient: f64,
    pub points: f64,
    pub comment: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bulletins::Entity",
        from = "Column::BulletinId",
        to = "super::bulletins::Column::Id"
    )]
    Bulletin,
}

impl Related<super::bulletins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bulletin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_bulletin_grade(self) -> crate::models::bulletins::entities::BulletinGrade {
        crate::models::bulletins::entities::BulletinGrade {
            id: self.id,
            bulletin_id: self.bulletin_id,
            subject_id: self.subject_id,
            grade: self.grade,
            coefficient: self.coefficient,
            points: self.points,
            comment: self.comment,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
