//! 成绩单验证日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bulletin_verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bulletin_id: Option<i64>,
    pub verification_type: String,
    pub code: String,
    pub outcome: String,
    pub verified_by: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_verification(self) -> crate::models::bulletins::entities::BulletinVerification {
        use crate::models::bulletins::entities::{
            BulletinVerification, VerificationOutcome, VerificationType,
        };

        BulletinVerification {
            id: self.id,
            bulletin_id: self.bulletin_id,
            verification_type: self
                .verification_type
                .parse::<VerificationType>()
                .unwrap_or(VerificationType::CodeEntry),
            code: self.code,
            outcome: self
                .outcome
                .parse::<VerificationOutcome>()
                .unwrap_or(VerificationOutcome::NotFound),
            verified_by: self.verified_by,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
