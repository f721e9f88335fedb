//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{EducafricError, Result};
use crate::models::grades::{CreateGradeRequest, Grade, GradeListQuery, UpdateGradeRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 录入成绩
    pub async fn create_grade_impl(&self, teacher_id: i64, req: CreateGradeRequest) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            teacher_id: Set(teacher_id),
            subject_id: Set(req.subject_id),
            class_id: Set(req.class_id),
            term_id: Set(req.term_id),
            value: Set(req.value),
            max_value: Set(req.max_value),
            grade_type: Set(req.grade_type.to_string()),
            description: Set(req.description),
            published_to_parents: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建成绩失败: {e}")))?;

        Ok(result.into_grade())
    }

    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 按条件列出成绩
    pub async fn list_grades_impl(&self, query: GradeListQuery) -> Result<Vec<Grade>> {
        let mut select = Grades::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(term_id) = query.term_id {
            select = select.filter(Column::TermId.eq(term_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if query.published_only {
            select = select.filter(Column::PublishedToParents.eq(true));
        }

        let grades = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 更新成绩
    pub async fn update_grade_impl(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        let Some(existing) = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(value) = update.value {
            model.value = Set(value);
        }
        if let Some(max_value) = update.max_value {
            model.max_value = Set(max_value);
        }
        if let Some(grade_type) = update.grade_type {
            model.grade_type = Set(grade_type.to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新成绩失败: {e}")))?;

        Ok(Some(updated.into_grade()))
    }

    pub async fn delete_grade_impl(&self, grade_id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(grade_id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 向家长公开班级某学期的成绩
    pub async fn publish_grades_impl(&self, class_id: i64, term_id: i64) -> Result<u64> {
        let result = Grades::update_many()
            .col_expr(Column::PublishedToParents, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::TermId.eq(term_id))
            .filter(Column::PublishedToParents.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("发布成绩失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
