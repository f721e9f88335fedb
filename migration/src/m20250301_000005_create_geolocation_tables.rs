use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 追踪设备
        manager
            .create_table(
                Table::create()
                    .table(TrackedDevices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackedDevices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrackedDevices::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackedDevices::RegisteredBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrackedDevices::SchoolId).big_integer().null())
                    .col(ColumnDef::new(TrackedDevices::DeviceName).string().not_null())
                    .col(ColumnDef::new(TrackedDevices::DeviceType).string().not_null())
                    .col(ColumnDef::new(TrackedDevices::Imei).string().null())
                    .col(
                        ColumnDef::new(TrackedDevices::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TrackedDevices::LowBatteryAlerted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TrackedDevices::BatteryLevel).integer().null())
                    .col(ColumnDef::new(TrackedDevices::LastLatitude).double().null())
                    .col(ColumnDef::new(TrackedDevices::LastLongitude).double().null())
                    .col(ColumnDef::new(TrackedDevices::LastSpeedKmh).double().null())
                    .col(ColumnDef::new(TrackedDevices::LastSeenAt).big_integer().null())
                    .col(
                        ColumnDef::new(TrackedDevices::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrackedDevices::Table, TrackedDevices::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 安全区域
        manager
            .create_table(
                Table::create()
                    .table(SafeZones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SafeZones::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SafeZones::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(SafeZones::DeviceId).big_integer().null())
                    .col(ColumnDef::new(SafeZones::SchoolId).big_integer().null())
                    .col(ColumnDef::new(SafeZones::Name).string().not_null())
                    .col(ColumnDef::new(SafeZones::ZoneType).string().not_null())
                    .col(ColumnDef::new(SafeZones::Latitude).double().not_null())
                    .col(ColumnDef::new(SafeZones::Longitude).double().not_null())
                    .col(ColumnDef::new(SafeZones::RadiusM).double().not_null())
                    .col(
                        ColumnDef::new(SafeZones::NotifyOnEntry)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SafeZones::NotifyOnExit)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SafeZones::AllowedTimeStart).string().null())
                    .col(ColumnDef::new(SafeZones::AllowedTimeEnd).string().null())
                    // JSON 数组
                    .col(ColumnDef::new(SafeZones::AllowedDays).text().not_null())
                    .col(
                        ColumnDef::new(SafeZones::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SafeZones::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SafeZones::Table, SafeZones::DeviceId)
                            .to(TrackedDevices::Table, TrackedDevices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 设备-区域 内外状态
        manager
            .create_table(
                Table::create()
                    .table(ZoneStatus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ZoneStatus::DeviceId).big_integer().not_null())
                    .col(ColumnDef::new(ZoneStatus::ZoneId).big_integer().not_null())
                    .col(ColumnDef::new(ZoneStatus::IsInside).boolean().not_null())
                    .col(
                        ColumnDef::new(ZoneStatus::ScheduleAlerted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ZoneStatus::UpdatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ZoneStatus::DeviceId)
                            .col(ZoneStatus::ZoneId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ZoneStatus::Table, ZoneStatus::DeviceId)
                            .to(TrackedDevices::Table, TrackedDevices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ZoneStatus::Table, ZoneStatus::ZoneId)
                            .to(SafeZones::Table, SafeZones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 位置告警
        manager
            .create_table(
                Table::create()
                    .table(LocationAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationAlerts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocationAlerts::DeviceId).big_integer().not_null())
                    .col(
                        ColumnDef::new(LocationAlerts::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LocationAlerts::ZoneId).big_integer().null())
                    .col(ColumnDef::new(LocationAlerts::AlertType).string().not_null())
                    .col(ColumnDef::new(LocationAlerts::Severity).string().not_null())
                    .col(ColumnDef::new(LocationAlerts::Message).text().not_null())
                    .col(ColumnDef::new(LocationAlerts::Latitude).double().not_null())
                    .col(ColumnDef::new(LocationAlerts::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(LocationAlerts::IsResolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LocationAlerts::ResolvedBy).big_integer().null())
                    .col(ColumnDef::new(LocationAlerts::ResolvedAt).big_integer().null())
                    .col(
                        ColumnDef::new(LocationAlerts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LocationAlerts::Table, LocationAlerts::DeviceId)
                            .to(TrackedDevices::Table, TrackedDevices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_location_alerts_student")
                    .table(LocationAlerts::Table)
                    .col(LocationAlerts::StudentId)
                    .col(LocationAlerts::IsResolved)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ZoneStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SafeZones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrackedDevices::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum TrackedDevices {
    #[sea_orm(iden = "tracked_devices")]
    Table,
    Id,
    StudentId,
    RegisteredBy,
    SchoolId,
    DeviceName,
    DeviceType,
    Imei,
    IsActive,
    LowBatteryAlerted,
    BatteryLevel,
    LastLatitude,
    LastLongitude,
    LastSpeedKmh,
    LastSeenAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SafeZones {
    #[sea_orm(iden = "safe_zones")]
    Table,
    Id,
    CreatedBy,
    DeviceId,
    SchoolId,
    Name,
    ZoneType,
    Latitude,
    Longitude,
    RadiusM,
    NotifyOnEntry,
    NotifyOnExit,
    AllowedTimeStart,
    AllowedTimeEnd,
    AllowedDays,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ZoneStatus {
    #[sea_orm(iden = "zone_status")]
    Table,
    DeviceId,
    ZoneId,
    IsInside,
    ScheduleAlerted,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LocationAlerts {
    #[sea_orm(iden = "location_alerts")]
    Table,
    Id,
    DeviceId,
    StudentId,
    ZoneId,
    AlertType,
    Severity,
    Message,
    Latitude,
    Longitude,
    IsResolved,
    ResolvedBy,
    ResolvedAt,
    CreatedAt,
}
