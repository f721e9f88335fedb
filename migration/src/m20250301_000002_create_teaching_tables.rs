use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Classes, Schools, Subjects, Terms, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 成绩表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::TermId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Value).double().not_null())
                    .col(ColumnDef::new(Grades::MaxValue).double().not_null())
                    .col(ColumnDef::new(Grades::GradeType).string().not_null())
                    .col(ColumnDef::new(Grades::Description).text().null())
                    .col(
                        ColumnDef::new(Grades::PublishedToParents)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_class_term")
                    .table(Grades::Table)
                    .col(Grades::ClassId)
                    .col(Grades::TermId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_student")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .to_owned(),
            )
            .await?;

        // 考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::Date).string().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::Reason).text().null())
                    .col(ColumnDef::new(Attendance::MarkedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(Attendance::ParentNotified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Attendance::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个学生每天一条
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_student_date")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Homework::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Homework::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Homework::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::Title).string().not_null())
                    .col(ColumnDef::new(Homework::Description).text().null())
                    .col(ColumnDef::new(Homework::DueDate).big_integer().not_null())
                    .col(ColumnDef::new(Homework::MaxPoints).double().null())
                    .col(
                        ColumnDef::new(Homework::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Homework::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Homework::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Homework::Table, Homework::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Homework::Table, Homework::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业提交表
        manager
            .create_table(
                Table::create()
                    .table(HomeworkSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HomeworkSubmissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::HomeworkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HomeworkSubmissions::Content).text().null())
                    // JSON 数组，元素为文件 token
                    .col(
                        ColumnDef::new(HomeworkSubmissions::Attachments)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(HomeworkSubmissions::Grade).double().null())
                    .col(ColumnDef::new(HomeworkSubmissions::Feedback).text().null())
                    .col(
                        ColumnDef::new(HomeworkSubmissions::GradedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSubmissions::GradedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HomeworkSubmissions::Table, HomeworkSubmissions::HomeworkId)
                            .to(Homework::Table, Homework::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HomeworkSubmissions::Table, HomeworkSubmissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_homework_student")
                    .table(HomeworkSubmissions::Table)
                    .col(HomeworkSubmissions::HomeworkId)
                    .col(HomeworkSubmissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课表
        manager
            .create_table(
                Table::create()
                    .table(TimetableSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimetableSlots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableSlots::StartTime).string().not_null())
                    .col(ColumnDef::new(TimetableSlots::EndTime).string().not_null())
                    .col(ColumnDef::new(TimetableSlots::Classroom).string().null())
                    .col(
                        ColumnDef::new(TimetableSlots::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TimetableSlots::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableSlots::Table, TimetableSlots::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableSlots::Table, TimetableSlots::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timetable_school_day")
                    .table(TimetableSlots::Table)
                    .col(TimetableSlots::SchoolId)
                    .col(TimetableSlots::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimetableSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HomeworkSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Homework::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    StudentId,
    TeacherId,
    SubjectId,
    ClassId,
    TermId,
    Value,
    MaxValue,
    GradeType,
    Description,
    PublishedToParents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    #[sea_orm(iden = "attendance")]
    Table,
    Id,
    StudentId,
    ClassId,
    SchoolId,
    Date,
    Status,
    Reason,
    MarkedBy,
    ParentNotified,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Homework {
    #[sea_orm(iden = "homework")]
    Table,
    Id,
    SchoolId,
    ClassId,
    SubjectId,
    TeacherId,
    Title,
    Description,
    DueDate,
    MaxPoints,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomeworkSubmissions {
    #[sea_orm(iden = "homework_submissions")]
    Table,
    Id,
    HomeworkId,
    StudentId,
    Content,
    Attachments,
    Status,
    IsLate,
    Grade,
    Feedback,
    GradedBy,
    SubmittedAt,
    GradedAt,
}

#[derive(DeriveIden)]
enum TimetableSlots {
    #[sea_orm(iden = "timetable_slots")]
    Table,
    Id,
    SchoolId,
    ClassId,
    SubjectId,
    TeacherId,
    DayOfWeek,
    StartTime,
    EndTime,
    Classroom,
    IsActive,
    CreatedAt,
}
