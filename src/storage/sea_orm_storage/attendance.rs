//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as AttendanceRecords};
use crate::entity::from_date;
use crate::errors::{EducafricError, Result};
use crate::models::attendance::{Attendance, AttendanceQuery, AttendanceStatus, AttendanceUpsert};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 同一学生同一天只保留一条记录
    pub async fn upsert_attendance_impl(
        &self,
        records: Vec<AttendanceUpsert>,
    ) -> Result<Vec<Attendance>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let date = from_date(record.date);
            let existing = AttendanceRecords::find()
                .filter(Column::StudentId.eq(record.student_id))
                .filter(Column::Date.eq(date.clone()))
                .one(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("查询考勤失败: {e}")))?;

            let model = match existing {
                Some(existing) => {
                    let status_changed = existing.status != record.status.as_str();
                    let mut model: ActiveModel = existing.into();
                    model.class_id = Set(record.class_id);
                    model.status = Set(record.status.to_string());
                    model.reason = Set(record.reason);
                    model.marked_by = Set(record.marked_by);
                    if status_changed {
                        model.parent_notified = Set(false);
                    }
                    model.updated_at = Set(now);
                    model.update(&txn).await
                }
                None => {
                    ActiveModel {
                        student_id: Set(record.student_id),
                        class_id: Set(record.class_id),
                        school_id: Set(record.school_id),
                        date: Set(date),
                        status: Set(record.status.to_string()),
                        reason: Set(record.reason),
                        marked_by: Set(record.marked_by),
                        parent_notified: Set(false),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| EducafricError::database_operation(format!("保存考勤失败: {e}")))?;

            saved.push(model.into_attendance());
        }

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    pub async fn list_attendance_impl(&self, query: AttendanceQuery) -> Result<Vec<Attendance>> {
        let mut select = AttendanceRecords::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(date) = query.date {
            select = select.filter(Column::Date.eq(from_date(date)));
        }
        // YYYY-MM-DD 字符串按字典序即按日期排序
        if let Some(from) = query.from {
            select = select.filter(Column::Date.gte(from_date(from)));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::Date.lte(from_date(to)));
        }

        let records = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }

    pub async fn mark_attendance_notified_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = AttendanceRecords::update_many()
            .col_expr(Column::ParentNotified, Expr::value(true))
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新考勤通知失败: {e}")))?;

        Ok(result.rows_affected)
    }

    pub async fn attendance_rate_impl(
        &self,
        school_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<f64>> {
        let day = from_date(date);

        let total = AttendanceRecords::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Date.eq(day.clone()))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计考勤失败: {e}")))?;

        if total == 0 {
            return Ok(None);
        }

        let attended = AttendanceRecords::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Date.eq(day))
            .filter(Column::Status.is_in([
                AttendanceStatus::Present.to_string(),
                AttendanceStatus::Late.to_string(),
            ]))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计考勤失败: {e}")))?;

        let rate = attended as f64 / total as f64 * 100.0;
        Ok(Some((rate * 10.0).round() / 10.0))
    }
}
