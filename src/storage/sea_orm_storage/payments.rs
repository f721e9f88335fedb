//! 支付存储操作

use super::users::subscription_update;
use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::entity::schools::{Column as SchoolColumn, Entity as Schools};
use crate::errors::{EducafricError, Result};
use crate::models::payments::{NewPayment, Payment, PaymentStatus};
use crate::models::users::{SubscriptionStatus, SubscriptionUpdate};
use crate::models::{PaginatedResponse, PaginationQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(payment.user_id),
            school_id: Set(payment.school_id),
            plan_id: Set(payment.plan_id),
            amount: Set(payment.amount),
            currency: Set(payment.currency),
            provider: Set(payment.provider),
            provider_payment_id: Set(payment.provider_payment_id),
            status: Set(PaymentStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建支付记录失败: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn get_payment_by_provider_id_impl(
        &self,
        provider_payment_id: &str,
    ) -> Result<Option<Payment>> {
        let result = Payments::find()
            .filter(Column::ProviderPaymentId.eq(provider_payment_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询支付记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 完成支付并在同一事务内开通订阅
    ///
    /// 只有 pending 的支付可以完成，重复回调返回 false；任一步失败整体回滚，
    /// 支付保持 pending 以便回调重投时重新结算。
    pub async fn complete_payment_impl(
        &self,
        provider_payment_id: &str,
        subscription: Option<SubscriptionUpdate>,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(payment) = Payments::find()
            .filter(Column::ProviderPaymentId.eq(provider_payment_id))
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询支付记录失败: {e}")))?
        else {
            return Ok(false);
        };

        let completed = Payments::update_many()
            .col_expr(Column::Status, Expr::value(PaymentStatus::Completed.to_string()))
            .col_expr(Column::CompletedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(payment.id))
            .filter(Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新支付状态失败: {e}")))?;
        if completed.rows_affected == 0 {
            return Ok(false);
        }

        if let Some(update) = subscription {
            let plan_id = update.plan_id.clone();
            let ends_at = update.ends_at;
            let activated = subscription_update(payment.user_id, update)
                .exec(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("更新订阅失败: {e}")))?;
            if activated.rows_affected == 0 {
                return Err(EducafricError::database_operation(format!(
                    "支付 {provider_payment_id} 的用户 {} 不存在",
                    payment.user_id
                )));
            }

            if let Some(school_id) = payment.school_id {
                let mut stmt = Schools::update_many()
                    .col_expr(
                        SchoolColumn::SubscriptionStatus,
                        Expr::value(SubscriptionStatus::Active.to_string()),
                    )
                    .col_expr(SchoolColumn::SubscriptionEndsAt, Expr::value(ends_at))
                    .col_expr(SchoolColumn::UpdatedAt, Expr::value(now));
                if let Some(plan_id) = plan_id {
                    stmt = stmt.col_expr(SchoolColumn::SubscriptionPlan, Expr::value(plan_id));
                }
                let school = stmt
                    .filter(SchoolColumn::Id.eq(school_id))
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        EducafricError::database_operation(format!("更新学校订阅失败: {e}"))
                    })?;
                if school.rows_affected == 0 {
                    return Err(EducafricError::database_operation(format!(
                        "支付 {provider_payment_id} 的学校 {school_id} 不存在"
                    )));
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn fail_payment_impl(&self, provider_payment_id: &str, reason: &str) -> Result<bool> {
        let result = Payments::update_many()
            .col_expr(Column::Status, Expr::value(PaymentStatus::Failed.to_string()))
            .col_expr(Column::FailureReason, Expr::value(Some(reason.to_string())))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::ProviderPaymentId.eq(provider_payment_id))
            .filter(Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新支付状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_payments_impl(
        &self,
        user_id: Option<i64>,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        let (page, size) = page_params(Some(query.page), Some(query.size));

        let mut select = Payments::find();
        if let Some(user_id) = user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询支付总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询支付页数失败: {e}")))?;
        let payments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询支付列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: payments.into_iter().map(|m| m.into_payment()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// (已完成笔数, 收入合计)
    pub async fn payment_totals_impl(&self) -> Result<(u64, i64)> {
        let amounts: Vec<i64> = Payments::find()
            .select_only()
            .column(Column::Amount)
            .filter(Column::Status.eq(PaymentStatus::Completed.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计支付收入失败: {e}")))?;

        Ok((amounts.len() as u64, amounts.iter().sum()))
    }
}
