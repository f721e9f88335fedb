//! 班级、科目、注册与家庭关系存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::parent_student_relations::{
    ActiveModel as RelationActiveModel, Column as RelationColumn, Entity as Relations,
};
use crate::entity::subjects::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subjects,
};
use crate::entity::timetable_slots::{Column as SlotColumn, Entity as TimetableSlots};
use crate::errors::{EducafricError, Result};
use crate::models::classes::{
    Class, CreateClassRequest, CreateSubjectRequest, EnrollOutcome, Enrollment, EnrollmentStatus,
    LinkParentRequest, ParentStudentRelation, Subject, UpdateClassRequest,
};
use crate::models::users::User;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name),
            level: Set(req.level),
            section: Set(req.section),
            teacher_id: Set(req.teacher_id),
            max_students: Set(req.max_students),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_class_by_name_impl(&self, school_id: i64, name: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn list_classes_impl(&self, school_id: i64) -> Result<Vec<Class>> {
        let classes = Classes::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_asc(Column::Level)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 班主任或在课表中任课的班级
    pub async fn list_teacher_classes_impl(&self, teacher_id: i64) -> Result<Vec<Class>> {
        let slot_class_ids: Vec<i64> = TimetableSlots::find()
            .select_only()
            .column(SlotColumn::ClassId)
            .filter(SlotColumn::TeacherId.eq(teacher_id))
            .filter(SlotColumn::IsActive.eq(true))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询任课班级失败: {e}")))?;

        let mut condition = Condition::any().add(Column::TeacherId.eq(teacher_id));
        if !slot_class_ids.is_empty() {
            condition = condition.add(Column::Id.is_in(slot_class_ids));
        }

        let classes = Classes::find()
            .filter(condition)
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询任课班级失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(level) = update.level {
            model.level = Set(level);
        }
        if let Some(section) = update.section {
            model.section = Set(Some(section));
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(max_students) = update.max_students {
            model.max_students = Set(max_students);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = SubjectActiveModel {
            school_id: Set(req.school_id),
            name_fr: Set(req.name_fr),
            name_en: Set(req.name_en),
            code: Set(req.code.trim().to_uppercase()),
            coefficient: Set(req.coefficient),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self, school_id: i64) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .filter(SubjectColumn::SchoolId.eq(school_id))
            .order_by_asc(SubjectColumn::Code)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 注册学生：同一时间只有一个有效注册，转班时旧注册标记为 transferred
    pub async fn enroll_student_impl(&self, class_id: i64, student_id: i64) -> Result<EnrollOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let class = Classes::find_by_id(class_id)
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| EducafricError::not_found(format!("班级不存在: {class_id}")))?;

        let current = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询注册失败: {e}")))?;

        if current.as_ref().is_some_and(|e| e.class_id == class_id) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let enrolled = Enrollments::find()
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计班级人数失败: {e}")))?;

        if enrolled >= class.max_students.max(0) as u64 {
            return Ok(EnrollOutcome::ClassFull);
        }

        if let Some(previous) = current {
            let mut model: EnrollmentActiveModel = previous.into();
            model.status = Set(EnrollmentStatus::Transferred.to_string());
            model
                .update(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("更新注册失败: {e}")))?;
        }

        let inserted = EnrollmentActiveModel {
            student_id: Set(student_id),
            class_id: Set(class_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EducafricError::database_operation(format!("创建注册失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(EnrollOutcome::Enrolled(inserted.into_enrollment()))
    }

    pub async fn get_active_enrollment_impl(&self, student_id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询注册失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<User>> {
        let student_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级学生失败: {e}")))?;

        let mut students = self.get_users_by_ids_impl(&student_ids).await?;
        students.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(students)
    }

    pub async fn link_parent_impl(&self, req: LinkParentRequest) -> Result<ParentStudentRelation> {
        if self
            .get_parent_student_relation_impl(req.parent_id, req.student_id)
            .await?
            .is_some()
        {
            return Err(EducafricError::conflict("家长与学生已关联"));
        }

        let model = RelationActiveModel {
            parent_id: Set(req.parent_id),
            student_id: Set(req.student_id),
            relationship: Set(req.relationship.to_string()),
            is_primary: Set(req.is_primary),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建家庭关系失败: {e}")))?;

        Ok(result.into_relation())
    }

    pub async fn get_parent_student_relation_impl(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<Option<ParentStudentRelation>> {
        let result = Relations::find()
            .filter(RelationColumn::ParentId.eq(parent_id))
            .filter(RelationColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询家庭关系失败: {e}")))?;

        Ok(result.map(|m| m.into_relation()))
    }

    pub async fn list_children_impl(&self, parent_id: i64) -> Result<Vec<User>> {
        let ids: Vec<i64> = Relations::find()
            .select_only()
            .column(RelationColumn::StudentId)
            .filter(RelationColumn::ParentId.eq(parent_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询子女失败: {e}")))?;

        self.get_users_by_ids_impl(&ids).await
    }

    pub async fn list_parents_of_student_impl(&self, student_id: i64) -> Result<Vec<User>> {
        let ids: Vec<i64> = Relations::find()
            .select_only()
            .column(RelationColumn::ParentId)
            .filter(RelationColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询家长失败: {e}")))?;

        self.get_users_by_ids_impl(&ids).await
    }
}
