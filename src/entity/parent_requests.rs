//! 家长申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parent_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub school_id: i64,
    pub request_type: String,
    pub category: String,
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub requested_date: Option<String>,
    pub admin_response: Option<String>,
    pub processed_by: Option<i64>,
    pub processed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_parent_request(self) -> crate::models::parent_requests::ParentRequest {
        use crate::models::parent_requests::{ParentRequest, ParentRequestStatus, RequestPriority};

        ParentRequest {
            id: self.id,
            parent_id: self.parent_id,
            student_id: self.student_id,
            school_id: self.school_id,
            request_type: self.request_type,
            category: self.category,
            subject: self.subject,
            description: self.description,
            priority: self
                .priority
                .parse::<RequestPriority>()
                .unwrap_or(RequestPriority::Medium),
            status: self
                .status
                .parse::<ParentRequestStatus>()
                .unwrap_or(ParentRequestStatus::Pending),
            requested_date: self.requested_date.as_deref().map(super::to_date),
            admin_response: self.admin_response,
            processed_by: self.processed_by,
            processed_at: super::to_datetime_opt(self.processed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
