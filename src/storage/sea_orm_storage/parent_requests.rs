//! 家长申请存储操作

use super::SeaOrmStorage;
use crate::entity::from_date;
use crate::entity::parent_requests::{ActiveModel, Column, Entity as ParentRequests};
use crate::errors::{EducafricError, Result};
use crate::models::parent_requests::{
    CreateParentRequest, ParentRequest, ParentRequestStatus, RespondParentRequest,
};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, ActiveModelTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_parent_request_impl(
        &self,
        parent_id: i64,
        school_id: i64,
        req: CreateParentRequest,
    ) -> Result<ParentRequest> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(req.student_id),
            school_id: Set(school_id),
            request_type: Set(req.request_type),
            category: Set(req.category),
            subject: Set(req.subject),
            description: Set(req.description),
            priority: Set(req.priority.to_string()),
            status: Set(ParentRequestStatus::Pending.to_string()),
            requested_date: Set(req.requested_date.map(from_date)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建家长申请失败: {e}")))?;

        Ok(result.into_parent_request())
    }

    pub async fn get_parent_request_by_id_impl(&self, id: i64) -> Result<Option<ParentRequest>> {
        let result = ParentRequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询家长申请失败: {e}")))?;

        Ok(result.map(|m| m.into_parent_request()))
    }

    pub async fn list_parent_requests_impl(
        &self,
        school_id: Option<i64>,
        parent_id: Option<i64>,
        status: Option<ParentRequestStatus>,
    ) -> Result<Vec<ParentRequest>> {
        let mut select = ParentRequests::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(parent_id) = parent_id {
            select = select.filter(Column::ParentId.eq(parent_id));
        }
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let requests = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询家长申请列表失败: {e}")))?;

        Ok(requests
            .into_iter()
            .map(|m| m.into_parent_request())
            .collect())
    }

    /// 处理申请，状态已被他人修改时返回 None
    pub async fn respond_parent_request_impl(
        &self,
        id: i64,
        expected: ParentRequestStatus,
        response: RespondParentRequest,
        processed_by: i64,
    ) -> Result<Option<ParentRequest>> {
        let now = chrono::Utc::now().timestamp();

        let result = ParentRequests::update_many()
            .col_expr(Column::Status, Expr::value(response.status.to_string()))
            .col_expr(Column::AdminResponse, Expr::value(response.response))
            .col_expr(Column::ProcessedBy, Expr::value(Some(processed_by)))
            .col_expr(Column::ProcessedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("处理家长申请失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_parent_request_by_id_impl(id).await
    }

    pub async fn count_parent_requests_impl(
        &self,
        school_id: i64,
        status: ParentRequestStatus,
    ) -> Result<u64> {
        ParentRequests::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(status.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计家长申请失败: {e}")))
    }
}
