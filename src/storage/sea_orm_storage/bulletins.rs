//! 成绩单存储操作
//!
//! 状态流转使用比较并交换：只有当前状态与版本号都与预期一致时才会更新，
//! 并在同一事务中写入审批历史。

use super::{SeaOrmStorage, page_params, pagination_info};
use crate::entity::bulletin_approvals::{
    ActiveModel as ApprovalActiveModel, Column as ApprovalColumn, Entity as Approvals,
};
use crate::entity::bulletin_grades::{
    ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as BulletinGrades,
};
use crate::entity::bulletin_verifications::ActiveModel as VerificationActiveModel;
use crate::entity::bulletins::{ActiveModel, Column, Entity as Bulletins};
use crate::errors::{EducafricError, Result};
use crate::models::bulletins::{
    Bulletin, BulletinAction, BulletinApproval, BulletinGrade, BulletinGradeRow,
    BulletinListQuery, BulletinListResponse, BulletinStatus, BulletinTransition,
    BulletinVerification, NewBulletin, NewBulletinVerification, compute_totals,
    competition_ranks,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

fn statuses_where(pred: fn(&BulletinStatus) -> bool) -> Vec<String> {
    BulletinStatus::ALL
        .iter()
        .filter(|s| pred(s))
        .map(|s| s.to_string())
        .collect()
}

impl SeaOrmStorage {
    pub async fn create_bulletin_impl(&self, bulletin: NewBulletin) -> Result<Bulletin> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(bulletin.school_id),
            student_id: Set(bulletin.student_id),
            class_id: Set(bulletin.class_id),
            term_id: Set(bulletin.term_id),
            status: Set(BulletinStatus::Draft.to_string()),
            version: Set(1),
            total_points: Set(0.0),
            total_coefficients: Set(0.0),
            general_average: Set(None),
            created_by: Set(bulletin.created_by),
            parent_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建成绩单失败: {e}")))?;

        Ok(result.into_bulletin())
    }

    pub async fn get_bulletin_by_id_impl(&self, id: i64) -> Result<Option<Bulletin>> {
        let result = Bulletins::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单失败: {e}")))?;

        Ok(result.map(|m| m.into_bulletin()))
    }

    pub async fn get_bulletin_by_student_term_impl(
        &self,
        student_id: i64,
        term_id: i64,
    ) -> Result<Option<Bulletin>> {
        let result = Bulletins::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::TermId.eq(term_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单失败: {e}")))?;

        Ok(result.map(|m| m.into_bulletin()))
    }

    pub async fn get_bulletin_by_code_impl(&self, code: &str) -> Result<Option<Bulletin>> {
        let result = Bulletins::find()
            .filter(Column::VerificationCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单失败: {e}")))?;

        Ok(result.map(|m| m.into_bulletin()))
    }

    /// 分页列出成绩单
    pub async fn list_bulletins_impl(&self, query: BulletinListQuery) -> Result<BulletinListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Bulletins::find();
        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(term_id) = query.term_id {
            select = select.filter(Column::TermId.eq(term_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(student_ids) = query.student_ids {
            if student_ids.is_empty() {
                return Ok(BulletinListResponse {
                    items: Vec::new(),
                    pagination: pagination_info(page, size, 0, 0),
                });
            }
            select = select.filter(Column::StudentId.is_in(student_ids));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单页数失败: {e}")))?;
        let bulletins = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单列表失败: {e}")))?;

        Ok(BulletinListResponse {
            items: bulletins.into_iter().map(|m| m.into_bulletin()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn list_bulletin_grades_impl(&self, bulletin_id: i64) -> Result<Vec<BulletinGrade>> {
        let grades = BulletinGrades::find()
            .filter(GradeColumn::BulletinId.eq(bulletin_id))
            .order_by_asc(GradeColumn::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_bulletin_grade()).collect())
    }

    /// 写入科目成绩并重算汇总，版本号随之递增
    ///
    /// 汇总行按 (可编辑状态, 版本) 条件更新；条件不满足时整个事务回滚，
    /// 避免成绩写进已提交的成绩单，也让基于旧版本的流转失败。
    pub async fn upsert_bulletin_grades_impl(
        &self,
        bulletin_id: i64,
        expected_version: i32,
        rows: Vec<BulletinGradeRow>,
        teacher_comment: Option<String>,
    ) -> Result<Option<Bulletin>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(bulletin) = Bulletins::find_by_id(bulletin_id)
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单失败: {e}")))?
        else {
            return Ok(None);
        };

        let status = bulletin
            .status
            .parse::<BulletinStatus>()
            .unwrap_or(BulletinStatus::Draft);
        if !status.is_editable() || bulletin.version != expected_version {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        for row in rows {
            let points = (row.grade * row.coefficient * 100.0).round() / 100.0;
            let existing = BulletinGrades::find()
                .filter(GradeColumn::BulletinId.eq(bulletin_id))
                .filter(GradeColumn::SubjectId.eq(row.subject_id))
                .one(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("查询成绩单成绩失败: {e}")))?;

            match existing {
                Some(existing) => {
                    let mut model: GradeActiveModel = existing.into();
                    model.grade = Set(row.grade);
                    model.coefficient = Set(row.coefficient);
                    model.points = Set(points);
                    model.comment = Set(row.comment);
                    model.updated_at = Set(now);
                    model.update(&txn).await.map(|_| ())
                }
                None => GradeActiveModel {
                    bulletin_id: Set(bulletin_id),
                    subject_id: Set(row.subject_id),
                    grade: Set(row.grade),
                    coefficient: Set(row.coefficient),
                    points: Set(points),
                    comment: Set(row.comment),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map(|_| ()),
            }
            .map_err(|e| EducafricError::database_operation(format!("保存成绩单成绩失败: {e}")))?;
        }

        let all_grades = BulletinGrades::find()
            .filter(GradeColumn::BulletinId.eq(bulletin_id))
            .all(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单成绩失败: {e}")))?;
        let totals = compute_totals(all_grades.iter().map(|g| (g.grade, g.coefficient)));

        let mut update = Bulletins::update_many()
            .col_expr(Column::TotalPoints, Expr::value(totals.total_points))
            .col_expr(Column::TotalCoefficients, Expr::value(totals.total_coefficients))
            .col_expr(Column::GeneralAverage, Expr::value(totals.general_average))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now));
        if let Some(comment) = teacher_comment {
            update = update.col_expr(Column::TeacherComment, Expr::value(Some(comment)));
        }
        let result = update
            .filter(Column::Id.eq(bulletin_id))
            .filter(Column::Status.is_in(statuses_where(BulletinStatus::is_editable)))
            .filter(Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新成绩单失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EducafricError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        let updated = Bulletins::find_by_id(bulletin_id)
            .one(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询成绩单失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.map(|m| m.into_bulletin()))
    }

    /// 比较并交换状态，成功后写入审批历史
    pub async fn apply_bulletin_transition_impl(&self, transition: BulletinTransition) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let actor = Some(transition.actor_id);

        let mut update = Bulletins::update_many()
            .col_expr(Column::Status, Expr::value(transition.new_status.to_string()))
            .col_expr(Column::Version, Expr::value(transition.expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        update = match transition.action {
            BulletinAction::Submit => update
                .col_expr(Column::SubmittedBy, Expr::value(actor))
                .col_expr(Column::SubmittedAt, Expr::value(Some(now))),
            BulletinAction::Approve => update
                .col_expr(Column::ApprovedBy, Expr::value(actor))
                .col_expr(Column::ApprovedAt, Expr::value(Some(now)))
                .col_expr(Column::DirectorComment, Expr::value(transition.comment.clone())),
            BulletinAction::Reject => update
                .col_expr(Column::RejectedBy, Expr::value(actor))
                .col_expr(Column::RejectedAt, Expr::value(Some(now)))
                .col_expr(Column::DirectorComment, Expr::value(transition.comment.clone())),
            BulletinAction::Publish => update
                .col_expr(Column::PublishedBy, Expr::value(actor))
                .col_expr(Column::PublishedAt, Expr::value(Some(now))),
        };

        if let Some(artifacts) = transition.publish {
            update = update
                .col_expr(Column::TrackingNumber, Expr::value(Some(artifacts.tracking_number)))
                .col_expr(
                    Column::VerificationCode,
                    Expr::value(Some(artifacts.verification_code)),
                )
                .col_expr(Column::QrPayload, Expr::value(Some(artifacts.qr_payload)))
                .col_expr(Column::SecurityHash, Expr::value(Some(artifacts.security_hash)))
                .col_expr(Column::Signature, Expr::value(Some(artifacts.signature)))
                .col_expr(Column::SignatureBatchId, Expr::value(transition.batch_id.clone()))
                .col_expr(Column::ClassRank, Expr::value(artifacts.class_rank))
                .col_expr(
                    Column::TotalStudentsInClass,
                    Expr::value(Some(artifacts.total_students_in_class)),
                );
        }

        let result = update
            .filter(Column::Id.eq(transition.bulletin_id))
            .filter(Column::Status.eq(transition.expected_status.to_string()))
            .filter(Column::Version.eq(transition.expected_version))
            .exec(&txn)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新成绩单状态失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EducafricError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        ApprovalActiveModel {
            bulletin_id: Set(transition.bulletin_id),
            actor_id: Set(transition.actor_id),
            action: Set(transition.action.to_string()),
            previous_status: Set(transition.expected_status.to_string()),
            new_status: Set(transition.new_status.to_string()),
            comment: Set(transition.comment),
            batch_id: Set(transition.batch_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EducafricError::database_operation(format!("写入审批历史失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn list_class_term_averages_impl(
        &self,
        class_id: i64,
        term_id: i64,
    ) -> Result<Vec<(i64, f64)>> {
        let rows: Vec<(i64, Option<f64>)> = Bulletins::find()
            .select_only()
            .column(Column::Id)
            .column(Column::GeneralAverage)
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::TermId.eq(term_id))
            .filter(Column::Status.is_in(statuses_where(BulletinStatus::is_ranked)))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询班级平均分失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, average)| average.map(|avg| (id, avg)))
            .collect())
    }

    /// 同班同学期尚未发布的成绩单数，非零时已发布的排名仍可能变化
    pub async fn count_unpublished_class_bulletins_impl(
        &self,
        class_id: i64,
        term_id: i64,
    ) -> Result<u64> {
        Bulletins::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::TermId.eq(term_id))
            .filter(Column::Status.ne(BulletinStatus::Published.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计未发布成绩单失败: {e}")))
    }

    /// 按已审定成绩单的平均分重算班级排名
    pub async fn refresh_bulletin_ranks_impl(&self, class_id: i64, term_id: i64) -> Result<()> {
        let averages = self.list_class_term_averages_impl(class_id, term_id).await?;
        let total = averages.len() as i32;
        let ranks = competition_ranks(&averages);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EducafricError::database_operation(format!("开启事务失败: {e}")))?;

        for (bulletin_id, rank) in ranks {
            Bulletins::update_many()
                .col_expr(Column::ClassRank, Expr::value(Some(rank)))
                .col_expr(Column::TotalStudentsInClass, Expr::value(Some(total)))
                .filter(Column::Id.eq(bulletin_id))
                .exec(&txn)
                .await
                .map_err(|e| EducafricError::database_operation(format!("更新班级排名失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| EducafricError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }

    pub async fn list_bulletin_approvals_impl(
        &self,
        bulletin_id: i64,
    ) -> Result<Vec<BulletinApproval>> {
        let approvals = Approvals::find()
            .filter(ApprovalColumn::BulletinId.eq(bulletin_id))
            .order_by_asc(ApprovalColumn::CreatedAt)
            .order_by_asc(ApprovalColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询审批历史失败: {e}")))?;

        Ok(approvals.into_iter().map(|m| m.into_approval()).collect())
    }

    pub async fn log_bulletin_verification_impl(
        &self,
        verification: NewBulletinVerification,
    ) -> Result<BulletinVerification> {
        let result = VerificationActiveModel {
            bulletin_id: Set(verification.bulletin_id),
            verification_type: Set(verification.verification_type.to_string()),
            code: Set(verification.code),
            outcome: Set(verification.outcome.to_string()),
            verified_by: Set(verification.verified_by),
            ip_address: Set(verification.ip_address),
            user_agent: Set(verification.user_agent),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EducafricError::database_operation(format!("写入验证日志失败: {e}")))?;

        Ok(result.into_verification())
    }

    /// 家长确认已查看，只记录第一次
    pub async fn mark_bulletin_parent_verified_impl(&self, id: i64) -> Result<bool> {
        let result = Bulletins::update_many()
            .col_expr(Column::ParentVerified, Expr::value(true))
            .col_expr(
                Column::ParentVerifiedAt,
                Expr::value(Some(chrono::Utc::now().timestamp())),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::ParentVerified.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新家长确认失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_bulletins_impl(
        &self,
        school_id: Option<i64>,
        created_by: Option<i64>,
        status: BulletinStatus,
    ) -> Result<u64> {
        let mut select = Bulletins::find().filter(Column::Status.eq(status.to_string()));
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(created_by) = created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计成绩单失败: {e}")))
    }
}
