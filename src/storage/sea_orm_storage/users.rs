use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::to_json_list;
use crate::errors::{EducafricError, Result};
use crate::models::{
    dashboards::RoleCount,
    notifications::UpdatePreferencesRequest,
    users::{
        CreateUserRequest, SubscriptionStatus, SubscriptionUpdate, UpdateUserRequest, User,
        UserListQuery, UserListResponse, UserRole, UserStatus,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, UpdateMany, sea_query::Expr,
};

/// 支付结算事务中也复用
pub(super) fn subscription_update(id: i64, update: SubscriptionUpdate) -> UpdateMany<Users> {
    let mut stmt = Users::update_many()
        .col_expr(
            Column::SubscriptionStatus,
            Expr::value(update.status.to_string()),
        )
        .col_expr(Column::SubscriptionEndsAt, Expr::value(update.ends_at))
        .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()));
    if let Some(plan_id) = update.plan_id {
        stmt = stmt.col_expr(Column::SubscriptionPlan, Expr::value(plan_id));
    }
    stmt.filter(Column::Id.eq(id))
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password_hash),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            role: Set(req.role.to_string()),
            secondary_roles: Set(to_json_list(&req.secondary_roles)),
            active_role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            school_id: Set(req.school_id),
            phone: Set(req.phone),
            whatsapp_number: Set(req.whatsapp_number),
            preferred_language: Set(req.preferred_language),
            notify_sms: Set(true),
            notify_whatsapp: Set(false),
            notify_email: Set(true),
            subscription_plan: Set(None),
            subscription_status: Set(SubscriptionStatus::None.to_string()),
            subscription_ends_at: Set(None),
            is_test_account: Set(req.is_test_account),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户，邮箱入库时已统一小写
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 列出学校成员（按主角色或兼任角色匹配）
    pub async fn list_school_users_impl(
        &self,
        school_id: i64,
        role: Option<UserRole>,
    ) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询学校成员失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|m| m.into_user())
            .filter(|u| role.is_none_or(|r| u.has_role(r)))
            .collect())
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EducafricError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn set_active_role_impl(&self, id: i64, role: UserRole) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::ActiveRole, Expr::value(role.to_string()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("切换角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let current_role = existing.role.clone();
        let current_active = existing.active_role.clone();
        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
            // 主角色变化时活动角色跟随，避免停留在已失去的角色上
            if current_active == current_role {
                model.active_role = Set(role.to_string());
            }
        }
        if let Some(secondary_roles) = update.secondary_roles {
            model.secondary_roles = Set(to_json_list(&secondary_roles));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(school_id) = update.school_id {
            model.school_id = Set(Some(school_id));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(whatsapp_number) = update.whatsapp_number {
            model.whatsapp_number = Set(Some(whatsapp_number));
        }
        if let Some(language) = update.preferred_language {
            model.preferred_language = Set(language);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    pub async fn update_notification_preferences_impl(
        &self,
        id: i64,
        update: UpdatePreferencesRequest,
    ) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(sms) = update.sms {
            model.notify_sms = Set(sms);
        }
        if let Some(whatsapp) = update.whatsapp {
            model.notify_whatsapp = Set(whatsapp);
        }
        if let Some(email) = update.email {
            model.notify_email = Set(email);
        }
        if let Some(number) = update.whatsapp_number {
            model.whatsapp_number = Set(Some(number));
        }
        if let Some(language) = update.preferred_language {
            model.preferred_language = Set(language);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新通知偏好失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    pub async fn update_user_subscription_impl(
        &self,
        id: i64,
        update: SubscriptionUpdate,
    ) -> Result<bool> {
        let result = subscription_update(id, update)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新订阅失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按主角色统计用户数量
    pub async fn count_users_by_role_impl(&self, school_id: Option<i64>) -> Result<Vec<RoleCount>> {
        let mut select = Users::find()
            .select_only()
            .column(Column::Role)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Role)
            .order_by_asc(Column::Role);
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        let rows: Vec<(String, i64)> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(role, count)| RoleCount {
                role,
                count: count.max(0) as u64,
            })
            .collect())
    }

    /// 订阅有效的用户数，已过期未续的不计入
    pub(crate) async fn count_subscribed_users(&self) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        Users::find()
            .filter(Column::SubscriptionStatus.eq(SubscriptionStatus::Active.to_string()))
            .filter(
                Condition::any()
                    .add(Column::SubscriptionEndsAt.is_null())
                    .add(Column::SubscriptionEndsAt.gt(now)),
            )
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计订阅用户失败: {e}")))
    }
}
