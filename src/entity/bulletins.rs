//! 成绩单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bulletins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term_id: i64,
    pub status: String,
    pub version: i32,
    pub total_points: f64,
    pub total_coefficients: f64,
    pub general_average: Option<f64>,
    pub class_rank: Option<i32>,
    pub total_students_in_class: Option<i32>,
    pub teacher_comment: Option<String>,
    pub director_comment: Option<String>,
    pub created_by: i64,
    pub submitted_by: Option<i64>,
    pub submitted_at: Option<i64>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejected_by: Option<i64>,
    pub rejected_at: Option<i64>,
    pub published_by: Option<i64>,
    pub published_at: Option<i64>,
    pub tracking_number: Option<String>,
    pub verification_code: Option<String>,
    pub qr_payload: Option<String>,
    pub security_hash: Option<String>,
    pub signature: Option<String>,
    pub signature_batch_id: Option<String>,
    pub parent_verified: bool,
    pub parent_verified_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bulletin_grades::Entity")]
    Grades,
    #[sea_orm(has_many = "super::bulletin_approvals::Entity")]
    Approvals,
}

impl Related<super::bulletin_grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl Related<super::bulletin_approvals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_bulletin(self) -> crate::models::bulletins::entities::Bulletin {
        use super::{to_datetime, to_datetime_opt};
        use crate::models::bulletins::entities::{Bulletin, BulletinStatus};

        Bulletin {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            class_id: self.class_id,
            term_id: self.term_id,
            status: self
                .status
                .parse::<BulletinStatus>()
                .unwrap_or(BulletinStatus::Draft),
            version: self.version,
            total_points: self.total_points,
            total_coefficients: self.total_coefficients,
            general_average: self.general_average,
            class_rank: self.class_rank,
            total_students_in_class: self.total_students_in_class,
            teacher_comment: self.teacher_comment,
            director_comment: self.director_comment,
            created_by: self.created_by,
            submitted_by: self.submitted_by,
            submitted_at: to_datetime_opt(self.submitted_at),
            approved_by: self.approved_by,
            approved_at: to_datetime_opt(self.approved_at),
            rejected_by: self.rejected_by,
            rejected_at: to_datetime_opt(self.rejected_at),
            published_by: self.published_by,
            published_at: to_datetime_opt(self.published_at),
            tracking_number: self.tracking_number,
            verification_code: self.verification_code,
            qr_payload: self.qr_payload,
            security_hash: self.security_hash,
            signature: self.signature,
            signature_batch_id: self.signature_batch_id,
            parent_verified: self.parent_verified,
            parent_verified_at: to_datetime_opt(self.parent_verified_at),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
