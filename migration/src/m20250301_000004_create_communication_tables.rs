use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Schools, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 消息表
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::RecipientType).string().not_null())
                    .col(ColumnDef::new(Messages::Subject).string().not_null())
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(ColumnDef::new(Messages::Category).string().not_null())
                    .col(ColumnDef::new(Messages::Priority).string().not_null())
                    .col(
                        ColumnDef::new(Messages::RecipientCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::SenderId)
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
                    .name("idx_messages_sender")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .to_owned(),
            )
            .await?;

        // 消息收件人
        manager
            .create_table(
                Table::create()
                    .table(MessageRecipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessageRecipients::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MessageRecipients::MessageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MessageRecipients::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MessageRecipients::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(MessageRecipients::ReadAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(MessageRecipients::Table, MessageRecipients::MessageId)
                            .to(Messages::Table, Messages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MessageRecipients::Table, MessageRecipients::UserId)
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
                    .name("idx_message_recipients_user")
                    .table(MessageRecipients::Table)
                    .col(MessageRecipients::UserId)
                    .col(MessageRecipients::IsRead)
                    .to_owned(),
            )
            .await?;

        // 站内通知
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().not_null())
                    .col(ColumnDef::new(Notifications::ReferenceId).big_integer().null())
                    // JSON：各通道投递结果
                    .col(ColumnDef::new(Notifications::Deliveries).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::ReadAt).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
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
                    .name("idx_notifications_user_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        // 家长申请
        manager
            .create_table(
                Table::create()
                    .table(ParentRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParentRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParentRequests::ParentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ParentRequests::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParentRequests::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(ParentRequests::RequestType).string().not_null())
                    .col(ColumnDef::new(ParentRequests::Category).string().not_null())
                    .col(ColumnDef::new(ParentRequests::Subject).string().not_null())
                    .col(ColumnDef::new(ParentRequests::Description).text().not_null())
                    .col(ColumnDef::new(ParentRequests::Priority).string().not_null())
                    .col(ColumnDef::new(ParentRequests::Status).string().not_null())
                    .col(ColumnDef::new(ParentRequests::RequestedDate).string().null())
                    .col(ColumnDef::new(ParentRequests::AdminResponse).text().null())
                    .col(ColumnDef::new(ParentRequests::ProcessedBy).big_integer().null())
                    .col(ColumnDef::new(ParentRequests::ProcessedAt).big_integer().null())
                    .col(
                        ColumnDef::new(ParentRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentRequests::Table, ParentRequests::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentRequests::Table, ParentRequests::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_parent_requests_school_status")
                    .table(ParentRequests::Table)
                    .col(ParentRequests::SchoolId)
                    .col(ParentRequests::Status)
                    .to_owned(),
            )
            .await?;

        // 支付记录
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Payments::PlanId).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Currency).string().not_null())
                    .col(ColumnDef::new(Payments::Provider).string().not_null())
                    .col(
                        ColumnDef::new(Payments::ProviderPaymentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::FailureReason).text().null())
                    .col(ColumnDef::new(Payments::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::UserId)
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
                    .name("idx_payments_user")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .to_owned(),
            )
            .await?;

        // 文件表
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::FileToken)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::FileName).string().not_null())
                    .col(ColumnDef::new(Files::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Files::FileType).string().not_null())
                    .col(ColumnDef::new(Files::UploadedAt).big_integer().not_null())
                    .col(ColumnDef::new(Files::UploaderId).big_integer().not_null())
                    .col(ColumnDef::new(Files::SchoolId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::UploaderId)
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
                    .name("idx_files_uploader_id")
                    .table(Files::Table)
                    .col(Files::UploaderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParentRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MessageRecipients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Messages {
    #[sea_orm(iden = "messages")]
    Table,
    Id,
    SchoolId,
    SenderId,
    RecipientType,
    Subject,
    Content,
    Category,
    Priority,
    RecipientCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MessageRecipients {
    #[sea_orm(iden = "message_recipients")]
    Table,
    Id,
    MessageId,
    UserId,
    IsRead,
    ReadAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    Kind,
    Title,
    Content,
    ReferenceId,
    Deliveries,
    IsRead,
    ReadAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ParentRequests {
    #[sea_orm(iden = "parent_requests")]
    Table,
    Id,
    ParentId,
    StudentId,
    SchoolId,
    RequestType,
    Category,
    Subject,
    Description,
    Priority,
    Status,
    RequestedDate,
    AdminResponse,
    ProcessedBy,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    UserId,
    SchoolId,
    PlanId,
    Amount,
    Currency,
    Provider,
    ProviderPaymentId,
    Status,
    FailureReason,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Files {
    #[sea_orm(iden = "files")]
    Table,
    FileToken,
    FileName,
    FileSize,
    FileType,
    UploadedAt,
    UploaderId,
    SchoolId,
}
