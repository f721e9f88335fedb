//! 考勤实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub school_id: i64,
    pub date: String,
    pub status: String,
    pub reason: Option<String>,
    pub marked_by: i64,
    pub parent_notified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance(self) -> crate::models::attendance::Attendance {
        use crate::models::attendance::{Attendance, AttendanceStatus};

        Attendance {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            school_id: self.school_id,
            date: super::to_date(&self.date),
            status: self
                .status
                .parse::<AttendanceStatus>()
                .unwrap_or(AttendanceStatus::Present),
            reason: self.reason,
            marked_by: self.marked_by,
            parent_notified: self.parent_notified,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
