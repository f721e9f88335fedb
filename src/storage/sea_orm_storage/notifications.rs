//! 通知存储操作

use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::entity::to_json_list;
use crate::errors::{EducafricError, Result};
use crate::models::PaginatedResponse;
use crate::models::notifications::{NewNotification, Notification, NotificationListParams};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建通知，同时记录各通道的投递结果
    pub async fn create_notification_impl(
        &self,
        notification: NewNotification,
    ) -> Result<Notification> {
        let model = ActiveModel {
            user_id: Set(notification.user_id),
            kind: Set(notification.kind.to_string()),
            title: Set(notification.title),
            content: Set(notification.content),
            reference_id: Set(notification.reference_id),
            deliveries: Set(to_json_list(&notification.deliveries)),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_impl(
        &self,
        user_id: i64,
        params: NotificationListParams,
    ) -> Result<PaginatedResponse<Notification>> {
        let (page, size) = page_params(Some(params.pagination.page), Some(params.pagination.size));

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        // 未读筛选
        if params.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询通知总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询通知页数失败: {e}")))?;
        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 获取用户未读通知数量
    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询未读通知数量失败: {e}")))
    }

    /// 标记通知为已读，只能操作自己的通知
    pub async fn mark_notification_read_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(Some(chrono::Utc::now().timestamp())))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(Some(chrono::Utc::now().timestamp())))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EducafricError::database_operation(format!("标记全部通知已读失败: {e}"))
            })?;

        Ok(result.rows_affected)
    }
}
