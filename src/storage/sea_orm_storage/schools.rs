//! 学校与学期存储操作

use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::from_date;
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::entity::terms::{
    ActiveModel as TermActiveModel, Column as TermColumn, Entity as Terms,
};
use crate::errors::{EducafricError, Result};
use crate::models::schools::{
    CreateSchoolRequest, CreateTermRequest, School, SchoolListQuery, SchoolListResponse, Term,
    UpdateSchoolRequest,
};
use crate::models::users::SubscriptionStatus;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

/// 按有效状态筛选：过期未续的 active 归入 expired
fn subscription_condition(status: SubscriptionStatus, now: i64) -> Condition {
    let lapsed = Condition::all()
        .add(Column::SubscriptionStatus.eq(SubscriptionStatus::Active.to_string()))
        .add(Column::SubscriptionEndsAt.lte(now));
    match status {
        SubscriptionStatus::Active => Condition::all()
            .add(Column::SubscriptionStatus.eq(SubscriptionStatus::Active.to_string()))
            .add(
                Condition::any()
                    .add(Column::SubscriptionEndsAt.is_null())
                    .add(Column::SubscriptionEndsAt.gt(now)),
            ),
        SubscriptionStatus::Expired => Condition::any()
            .add(Column::SubscriptionStatus.eq(SubscriptionStatus::Expired.to_string()))
            .add(lapsed),
        other => Condition::all().add(Column::SubscriptionStatus.eq(other.to_string())),
    }
}

impl SeaOrmStorage {
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            school_type: Set(req.school_type.to_string()),
            address: Set(req.address),
            city: Set(req.city),
            phone: Set(req.phone),
            email: Set(req.email),
            director_id: Set(req.director_id),
            subscription_plan: Set(None),
            subscription_status: Set(SubscriptionStatus::None.to_string()),
            subscription_ends_at: Set(None),
            geolocation_enabled: Set(req.geolocation_enabled),
            is_sandbox: Set(req.is_sandbox),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建学校失败: {e}")))?;

        Ok(result.into_school())
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn get_sandbox_school_impl(&self) -> Result<Option<School>> {
        let result = Schools::find()
            .filter(Column::IsSandbox.eq(true))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询沙盒学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn list_schools_with_pagination_impl(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Schools::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }
        if let Some(status) = query.subscription_status {
            select = select.filter(subscription_condition(status, chrono::Utc::now().timestamp()));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校页数失败: {e}")))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(SchoolListResponse {
            items: schools.into_iter().map(|m| m.into_school()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        let Some(existing) = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(school_type) = update.school_type {
            model.school_type = Set(school_type.to_string());
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(city) = update.city {
            model.city = Set(Some(city));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(director_id) = update.director_id {
            model.director_id = Set(Some(director_id));
        }
        if let Some(plan) = update.subscription_plan {
            model.subscription_plan = Set(Some(plan));
        }
        // 手工调整的订阅不限期
        if let Some(status) = update.subscription_status {
            model.subscription_status = Set(status.to_string());
            model.subscription_ends_at = Set(None);
        }
        if let Some(enabled) = update.geolocation_enabled {
            model.geolocation_enabled = Set(enabled);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新学校失败: {e}")))?;

        Ok(Some(updated.into_school()))
    }

    pub async fn delete_school_impl(&self, id: i64) -> Result<bool> {
        let result = Schools::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除学校失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_schools_impl(&self) -> Result<u64> {
        Schools::find()
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计学校数量失败: {e}")))
    }

    pub async fn count_active_subscriptions_impl(&self) -> Result<u64> {
        let schools = Schools::find()
            .filter(subscription_condition(
                SubscriptionStatus::Active,
                chrono::Utc::now().timestamp(),
            ))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计学校订阅失败: {e}")))?;

        Ok(schools + self.count_subscribed_users().await?)
    }

    pub async fn create_term_impl(&self, school_id: i64, req: CreateTermRequest) -> Result<Term> {
        let model = TermActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            academic_year: Set(req.academic_year),
            start_date: Set(from_date(req.start_date)),
            end_date: Set(from_date(req.end_date)),
            is_active: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建学期失败: {e}")))?;

        Ok(result.into_term())
    }

    pub async fn get_term_by_id_impl(&self, id: i64) -> Result<Option<Term>> {
        let result = Terms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_term()))
    }

    pub async fn list_terms_impl(&self, school_id: i64) -> Result<Vec<Term>> {
        let terms = Terms::find()
            .filter(TermColumn::SchoolId.eq(school_id))
            .order_by_desc(TermColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    /// 同一学校只保留一个激活学期
    pub async fn activate_term_impl(&self, school_id: i64, term_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        Terms::update_many()
            .col_expr(TermColumn::IsActive, Expr::value(false))
            .filter(TermColumn::SchoolId.eq(school_id))
            .exec(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("重置学期状态失败: {e}")))?;

        let result = Terms::update_many()
            .col_expr(TermColumn::IsActive, Expr::value(true))
            .filter(TermColumn::Id.eq(term_id))
            .filter(TermColumn::SchoolId.eq(school_id))
            .exec(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("激活学期失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EducafricError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}
