//! 支付记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub school_id: Option<i64>,
    pub plan_id: String,
    pub amount: i64,
    pub currency: String,
    pub provider: String,
    #[sea_orm(unique)]
    pub provider_payment_id: String,
    pub status: String,
    pub failure_reason: Option<String>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::Payment {
        use crate::models::payments::{Payment, PaymentStatus};

        Payment {
            id: self.id,
            user_id: self.user_id,
            school_id: self.school_id,
            plan_id: self.plan_id,
            amount: self.amount,
            currency: self.currency,
            provider: self.provider,
            provider_payment_id: self.provider_payment_id,
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            failure_reason: self.failure_reason,
            completed_at: super::to_datetime_opt(self.completed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
