//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::timetable_slots::{ActiveModel, Column, Entity as TimetableSlots};
use crate::errors::{EducafricError, Result};
use crate::models::timetable::{
    CreateTimetableSlotRequest, TimetableQuery, TimetableSlot, canonical_hhmm,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_timetable_slot_impl(
        &self,
        school_id: i64,
        req: CreateTimetableSlotRequest,
    ) -> Result<TimetableSlot> {
        let model = ActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            day_of_week: Set(req.day_of_week),
            start_time: Set(canonical_hhmm(&req.start_time)),
            end_time: Set(canonical_hhmm(&req.end_time)),
            classroom: Set(req.classroom),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建课表时段失败: {e}")))?;

        Ok(result.into_slot())
    }

    pub async fn get_timetable_slot_impl(&self, id: i64) -> Result<Option<TimetableSlot>> {
        let result = TimetableSlots::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询课表时段失败: {e}")))?;

        Ok(result.map(|m| m.into_slot()))
    }

    pub async fn list_timetable_impl(
        &self,
        school_id: i64,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableSlot>> {
        let mut select = TimetableSlots::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::IsActive.eq(true));

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(day) = query.day_of_week {
            select = select.filter(Column::DayOfWeek.eq(day));
        }

        // 入库时已补零，按字符串排序即按时间排序
        let slots = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    /// 教师在所有学校某天的有效课时
    pub async fn list_teacher_day_slots_impl(
        &self,
        teacher_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<TimetableSlot>> {
        let slots = TimetableSlots::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询教师课表失败: {e}")))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    pub async fn delete_timetable_slot_impl(&self, id: i64) -> Result<bool> {
        let result = TimetableSlots::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除课表时段失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
