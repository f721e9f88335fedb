//! 站内消息存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::message_recipients::{
    ActiveModel as RecipientActiveModel, Column as RecipientColumn, Entity as Recipients,
};
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::entity::to_datetime_opt;
use crate::errors::{EducafricError, Result};
use crate::models::messages::{InboxItem, Message, MessageListParams, NewMessage};
use crate::models::{PaginatedResponse, PaginationQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建消息并为每个收件人生成一条收件记录
    pub async fn create_message_impl(&self, message: NewMessage) -> Result<Message> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let mut recipient_ids = message.recipient_ids;
        recipient_ids.sort_unstable();
        recipient_ids.dedup();

        let saved = ActiveModel {
            school_id: Set(message.school_id),
            sender_id: Set(message.sender_id),
            recipient_type: Set(message.recipient_type.to_string()),
            subject: Set(message.subject),
            content: Set(message.content),
            category: Set(message.category),
            priority: Set(message.priority.to_string()),
            recipient_count: Set(recipient_ids.len() as i32),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EducafricError::database_operation(format!("创建消息失败: {e}")))?;

        if !recipient_ids.is_empty() {
            let rows = recipient_ids.iter().map(|user_id| RecipientActiveModel {
                message_id: Set(saved.id),
                user_id: Set(*user_id),
                is_read: Set(false),
                read_at: Set(None),
                ..Default::default()
            });
            Recipients::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("创建收件记录失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_message())
    }

    /// 收件箱（按时间倒序）
    pub async fn list_inbox_impl(
        &self,
        user_id: i64,
        params: MessageListParams,
    ) -> Result<PaginatedResponse<InboxItem>> {
        let (page, size) = page_params(Some(params.pagination.page), Some(params.pagination.size));

        let mut select = Recipients::find().filter(RecipientColumn::UserId.eq(user_id));
        if params.unread_only {
            select = select.filter(RecipientColumn::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(RecipientColumn::MessageId)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询收件箱总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询收件箱页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询收件箱失败: {e}")))?;

        let message_ids: Vec<i64> = rows.iter().map(|r| r.message_id).collect();
        let mut messages: HashMap<i64, Message> = Messages::find()
            .filter(Column::Id.is_in(message_ids))
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询消息失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_message()))
            .collect();

        let items = rows
            .into_iter()
            .filter_map(|row| {
                messages.remove(&row.message_id).map(|message| InboxItem {
                    recipient_id: row.id,
                    message,
                    is_read: row.is_read,
                    read_at: to_datetime_opt(row.read_at),
                })
            })
            .collect();

        Ok(PaginatedResponse {
            items,
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn list_sent_messages_impl(
        &self,
        sender_id: i64,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        let (page, size) = page_params(Some(query.page), Some(query.size));

        let paginator = Messages::find()
            .filter(Column::SenderId.eq(sender_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询已发送总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询已发送页数失败: {e}")))?;
        let messages = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询已发送消息失败: {e}")))?;

        Ok(PaginatedResponse {
            items: messages.into_iter().map(|m| m.into_message()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 标记已读，非收件人返回 false
    pub async fn mark_message_read_impl(&self, message_id: i64, user_id: i64) -> Result<bool> {
        let exists = Recipients::find()
            .filter(RecipientColumn::MessageId.eq(message_id))
            .filter(RecipientColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询收件记录失败: {e}")))?;
        if exists == 0 {
            return Ok(false);
        }

        Recipients::update_many()
            .col_expr(RecipientColumn::IsRead, Expr::value(true))
            .col_expr(
                RecipientColumn::ReadAt,
                Expr::value(Some(chrono::Utc::now().timestamp())),
            )
            .filter(RecipientColumn::MessageId.eq(message_id))
            .filter(RecipientColumn::UserId.eq(user_id))
            .filter(RecipientColumn::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("标记消息已读失败: {e}")))?;

        Ok(true)
    }
}
