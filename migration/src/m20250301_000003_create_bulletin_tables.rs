use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Classes, Schools, Subjects, Terms, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 成绩单表
        manager
            .create_table(
                Table::create()
                    .table(Bulletins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bulletins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bulletins::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::TermId).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bulletins::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bulletins::TotalPoints)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Bulletins::TotalCoefficients)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Bulletins::GeneralAverage).double().null())
                    .col(ColumnDef::new(Bulletins::ClassRank).integer().null())
                    .col(
                        ColumnDef::new(Bulletins::TotalStudentsInClass)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Bulletins::TeacherComment).text().null())
                    .col(ColumnDef::new(Bulletins::DirectorComment).text().null())
                    .col(ColumnDef::new(Bulletins::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::SubmittedBy).big_integer().null())
                    .col(ColumnDef::new(Bulletins::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(Bulletins::ApprovedBy).big_integer().null())
                    .col(ColumnDef::new(Bulletins::ApprovedAt).big_integer().null())
                    .col(ColumnDef::new(Bulletins::RejectedBy).big_integer().null())
                    .col(ColumnDef::new(Bulletins::RejectedAt).big_integer().null())
                    .col(ColumnDef::new(Bulletins::PublishedBy).big_integer().null())
                    .col(ColumnDef::new(Bulletins::PublishedAt).big_integer().null())
                    .col(ColumnDef::new(Bulletins::TrackingNumber).string().null())
                    .col(ColumnDef::new(Bulletins::VerificationCode).string().null())
                    .col(ColumnDef::new(Bulletins::QrPayload).text().null())
                    .col(ColumnDef::new(Bulletins::SecurityHash).string().null())
                    .col(ColumnDef::new(Bulletins::Signature).string().null())
                    .col(ColumnDef::new(Bulletins::SignatureBatchId).string().null())
                    .col(
                        ColumnDef::new(Bulletins::ParentVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bulletins::ParentVerifiedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Bulletins::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Bulletins::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bulletins::Table, Bulletins::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bulletins::Table, Bulletins::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bulletins::Table, Bulletins::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bulletins::Table, Bulletins::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个学生每学期一份
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bulletins_student_term")
                    .table(Bulletins::Table)
                    .col(Bulletins::StudentId)
                    .col(Bulletins::TermId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bulletins_class_term_status")
                    .table(Bulletins::Table)
                    .col(Bulletins::ClassId)
                    .col(Bulletins::TermId)
                    .col(Bulletins::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bulletins_verification_code")
                    .table(Bulletins::Table)
                    .col(Bulletins::VerificationCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 成绩单科目成绩
        manager
            .create_table(
                Table::create()
                    .table(BulletinGrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BulletinGrades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BulletinGrades::BulletinId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BulletinGrades::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BulletinGrades::Grade).double().not_null())
                    .col(ColumnDef::new(BulletinGrades::Coefficient).double().not_null())
                    .col(ColumnDef::new(BulletinGrades::Points).double().not_null())
                    .col(ColumnDef::new(BulletinGrades::Comment).text().null())
                    .col(
                        ColumnDef::new(BulletinGrades::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BulletinGrades::Table, BulletinGrades::BulletinId)
                            .to(Bulletins::Table, Bulletins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BulletinGrades::Table, BulletinGrades::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bulletin_grades_subject")
                    .table(BulletinGrades::Table)
                    .col(BulletinGrades::BulletinId)
                    .col(BulletinGrades::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 审批历史
        manager
            .create_table(
                Table::create()
                    .table(BulletinApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BulletinApprovals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BulletinApprovals::BulletinId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BulletinApprovals::ActorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BulletinApprovals::Action).string().not_null())
                    .col(
                        ColumnDef::new(BulletinApprovals::PreviousStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BulletinApprovals::NewStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BulletinApprovals::Comment).text().null())
                    .col(ColumnDef::new(BulletinApprovals::BatchId).string().null())
                    .col(
                        ColumnDef::new(BulletinApprovals::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BulletinApprovals::Table, BulletinApprovals::BulletinId)
                            .to(Bulletins::Table, Bulletins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bulletin_approvals_bulletin")
                    .table(BulletinApprovals::Table)
                    .col(BulletinApprovals::BulletinId)
                    .to_owned(),
            )
            .await?;

        // 验证日志（bulletin_id 可为空：未找到的验证码也记录）
        manager
            .create_table(
                Table::create()
                    .table(BulletinVerifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BulletinVerifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::BulletinId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::VerificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BulletinVerifications::Code).string().not_null())
                    .col(
                        ColumnDef::new(BulletinVerifications::Outcome)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::VerifiedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::IpAddress)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::UserAgent)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BulletinVerifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                BulletinVerifications::Table,
                                BulletinVerifications::BulletinId,
                            )
                            .to(Bulletins::Table, Bulletins::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BulletinVerifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BulletinApprovals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BulletinGrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bulletins::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Bulletins {
    #[sea_orm(iden = "bulletins")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ClassId,
    TermId,
    Status,
    Version,
    TotalPoints,
    TotalCoefficients,
    GeneralAverage,
    ClassRank,
    TotalStudentsInClass,
    TeacherComment,
    DirectorComment,
    CreatedBy,
    SubmittedBy,
    SubmittedAt,
    ApprovedBy,
    ApprovedAt,
    RejectedBy,
    RejectedAt,
    PublishedBy,
    PublishedAt,
    TrackingNumber,
    VerificationCode,
    QrPayload,
    SecurityHash,
    Signature,
    SignatureBatchId,
    ParentVerified,
    ParentVerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BulletinGrades {
    #[sea_orm(iden = "bulletin_grades")]
    Table,
    Id,
    BulletinId,
    SubjectId,
    Grade,
    Coefficient,
    Points,
    Comment,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BulletinApprovals {
    #[sea_orm(iden = "bulletin_approvals")]
    Table,
    Id,
    BulletinId,
    ActorId,
    Action,
    PreviousStatus,
    NewStatus,
    Comment,
    BatchId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BulletinVerifications {
    #[sea_orm(iden = "bulletin_verifications")]
    Table,
    Id,
    BulletinId,
    VerificationType,
    Code,
    Outcome,
    VerifiedBy,
    IpAddress,
    UserAgent,
    CreatedAt,
}
