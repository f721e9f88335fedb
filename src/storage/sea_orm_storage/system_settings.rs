//! 系统设置存储实现

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::system_settings::{ActiveModel, Column, Entity as SystemSettings};
use crate::entity::system_settings_audit::{
    ActiveModel as AuditActiveModel, Column as AuditColumn, Entity as SystemSettingsAudit,
};
use crate::errors::{EducafricError, Result};
use crate::models::system::{SettingAuditListResponse, SettingAuditQuery, SystemSetting};

use super::{SeaOrmStorage, page_params, pagination_info};

impl SeaOrmStorage {
    /// 获取所有设置
    pub async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by_asc(Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    pub async fn get_setting_impl(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("获取设置失败: {e}")))?;

        Ok(setting.map(|s| s.into_setting()))
    }

    /// 更新设置并在同一事务中写入审计日志
    pub async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("获取设置失败: {e}")))?
            .ok_or_else(|| EducafricError::not_found(format!("配置项不存在: {key}")))?;

        let old_value = existing.value.clone();

        let mut model: ActiveModel = existing.into();
        model.value = Set(value.to_string());
        model.updated_at = Set(now);
        model.updated_by = Set(Some(user_id));

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新设置失败: {e}")))?;

        AuditActiveModel {
            setting_key: Set(key.to_string()),
            old_value: Set(Some(old_value)),
            new_value: Set(value.to_string()),
            changed_by: Set(user_id),
            changed_at: Set(now),
            ip_address: Set(ip_address),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EducafricError::database_operation(format!("创建审计日志失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_setting())
    }

    /// 获取审计日志
    pub async fn list_setting_audits_impl(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        let (page, size) = page_params(query.page, query.size.or(Some(20)));

        let mut select = SystemSettingsAudit::find();
        if let Some(key) = &query.key {
            select = select.filter(AuditColumn::SettingKey.eq(key.as_str()));
        }

        let paginator = select
            .order_by_desc(AuditColumn::ChangedAt)
            .order_by_desc(AuditColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计审计日志失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计审计日志失败: {e}")))?;
        let audits = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("获取审计日志失败: {e}")))?;

        Ok(SettingAuditListResponse {
            audits: audits.into_iter().map(|a| a.into_audit()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }
}
