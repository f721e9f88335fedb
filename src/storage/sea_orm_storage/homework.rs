//! 作业与作业提交存储操作

use super::SeaOrmStorage;
use crate::entity::homework::{ActiveModel, Column, Entity as HomeworkEntity};
use crate::entity::homework_submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submissions,
};
use crate::entity::to_json_list;
use crate::errors::{EducafricError, Result};
use crate::models::homework::{
    CreateHomeworkRequest, GradeSubmissionRequest, Homework, HomeworkListQuery,
    HomeworkSubmission, SubmissionStatus, SubmitHomeworkRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_homework_impl(
        &self,
        school_id: i64,
        teacher_id: i64,
        req: CreateHomeworkRequest,
    ) -> Result<Homework> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(teacher_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            max_points: Set(req.max_points),
            is_published: Set(req.publish),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_homework())
    }

    pub async fn get_homework_by_id_impl(&self, id: i64) -> Result<Option<Homework>> {
        let result = HomeworkEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_homework()))
    }

    pub async fn publish_homework_impl(&self, id: i64) -> Result<Option<Homework>> {
        let Some(existing) = HomeworkEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.is_published {
            return Ok(Some(existing.into_homework()));
        }

        let mut model: ActiveModel = existing.into();
        model.is_published = Set(true);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("发布作业失败: {e}")))?;

        Ok(Some(updated.into_homework()))
    }

    pub async fn list_homework_impl(&self, query: HomeworkListQuery) -> Result<Vec<Homework>> {
        let mut select = HomeworkEntity::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if query.published_only {
            select = select.filter(Column::IsPublished.eq(true));
        }

        let items = select
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_homework()).collect())
    }

    /// 提交或重新提交作业，重新提交会清空之前的批改结果
    pub async fn upsert_submission_impl(
        &self,
        homework_id: i64,
        student_id: i64,
        req: SubmitHomeworkRequest,
        is_late: bool,
    ) -> Result<HomeworkSubmission> {
        let now = chrono::Utc::now().timestamp();
        let existing = Submissions::find()
            .filter(SubmissionColumn::HomeworkId.eq(homework_id))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交失败: {e}")))?;

        let saved = match existing {
            Some(existing) => {
                let mut model: SubmissionActiveModel = existing.into();
                model.content = Set(req.content);
                model.attachments = Set(to_json_list(&req.attachments));
                model.status = Set(SubmissionStatus::Submitted.to_string());
                model.is_late = Set(is_late);
                model.grade = Set(None);
                model.feedback = Set(None);
                model.graded_by = Set(None);
                model.graded_at = Set(None);
                model.submitted_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                SubmissionActiveModel {
                    homework_id: Set(homework_id),
                    student_id: Set(student_id),
                    content: Set(req.content),
                    attachments: Set(to_json_list(&req.attachments)),
                    status: Set(SubmissionStatus::Submitted.to_string()),
                    is_late: Set(is_late),
                    submitted_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| EducafricError::database_operation(format!("保存提交失败: {e}")))?;

        Ok(saved.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<HomeworkSubmission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_impl(
        &self,
        homework_id: i64,
        student_id: i64,
    ) -> Result<Option<HomeworkSubmission>> {
        let result = Submissions::find()
            .filter(SubmissionColumn::HomeworkId.eq(homework_id))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_impl(&self, homework_id: i64) -> Result<Vec<HomeworkSubmission>> {
        let items = Submissions::find()
            .filter(SubmissionColumn::HomeworkId.eq(homework_id))
            .order_by_asc(SubmissionColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<HomeworkSubmission>> {
        let items = Submissions::find()
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        graded_by: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Option<HomeworkSubmission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: SubmissionActiveModel = existing.into();
        model.grade = Set(Some(req.grade));
        model.feedback = Set(req.feedback);
        model.graded_by = Set(Some(graded_by));
        model.graded_at = Set(Some(chrono::Utc::now().timestamp()));
        model.status = Set(SubmissionStatus::Graded.to_string());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("批改提交失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    pub async fn count_pending_submissions_impl(&self, teacher_id: i64) -> Result<u64> {
        Submissions::find()
            .inner_join(HomeworkEntity)
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::Submitted.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计待批改提交失败: {e}")))
    }
}
