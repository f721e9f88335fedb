//! 设备、安全区域与位置告警存储操作

use super::SeaOrmStorage;
use crate::entity::location_alerts::{
    ActiveModel as AlertActiveModel, Column as AlertColumn, Entity as Alerts,
};
use crate::entity::safe_zones::{ActiveModel as ZoneActiveModel, Column as ZoneColumn, Entity as Zones};
use crate::entity::to_json_list;
use crate::entity::tracked_devices::{ActiveModel, Column, Entity as Devices};
use crate::entity::zone_status::{
    ActiveModel as ZoneStatusActiveModel, Column as ZoneStatusColumn, Entity as ZoneStatuses,
};
use crate::errors::{EducafricError, Result};
use crate::models::geolocation::{
    CreateSafeZoneRequest, DevicePositionUpdate, LocationAlert, NewLocationAlert,
    RegisterDeviceRequest, SafeZone, TrackedDevice, UpdateSafeZoneRequest, ZoneFilter, ZoneStatus,
};
use crate::models::timetable::canonical_hhmm;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 注册设备
    pub async fn create_device_impl(
        &self,
        registered_by: i64,
        school_id: Option<i64>,
        req: RegisterDeviceRequest,
    ) -> Result<TrackedDevice> {
        let model = ActiveModel {
            student_id: Set(req.student_id),
            registered_by: Set(registered_by),
            school_id: Set(school_id),
            device_name: Set(req.device_name),
            device_type: Set(req.device_type.to_string()),
            imei: Set(req.imei),
            is_active: Set(true),
            low_battery_alerted: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("注册设备失败: {e}")))?;

        Ok(result.into_device())
    }

    pub async fn get_device_by_id_impl(&self, id: i64) -> Result<Option<TrackedDevice>> {
        let result = Devices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询设备失败: {e}")))?;

        Ok(result.map(|m| m.into_device()))
    }

    pub async fn list_devices_for_students_impl(
        &self,
        student_ids: &[i64],
    ) -> Result<Vec<TrackedDevice>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let devices = Devices::find()
            .filter(Column::StudentId.is_in(student_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询设备列表失败: {e}")))?;

        Ok(devices.into_iter().map(|m| m.into_device()).collect())
    }

    pub async fn list_devices_for_school_impl(&self, school_id: i64) -> Result<Vec<TrackedDevice>> {
        let devices = Devices::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询设备列表失败: {e}")))?;

        Ok(devices.into_iter().map(|m| m.into_device()).collect())
    }

    pub async fn delete_device_impl(&self, id: i64) -> Result<bool> {
        let result = Devices::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除设备失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写回最新位置与电量
    pub async fn update_device_position_impl(
        &self,
        id: i64,
        update: DevicePositionUpdate,
    ) -> Result<Option<TrackedDevice>> {
        let Some(existing) = Devices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询设备失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.last_latitude = Set(Some(update.latitude));
        model.last_longitude = Set(Some(update.longitude));
        model.last_speed_kmh = Set(update.speed_kmh);
        if let Some(level) = update.battery_level {
            model.battery_level = Set(Some(level));
        }
        model.low_battery_alerted = Set(update.low_battery_alerted);
        model.last_seen_at = Set(Some(chrono::Utc::now().timestamp()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新设备位置失败: {e}")))?;

        Ok(Some(updated.into_device()))
    }

    pub async fn create_zone_impl(
        &self,
        created_by: i64,
        req: CreateSafeZoneRequest,
    ) -> Result<SafeZone> {
        let model = ZoneActiveModel {
            created_by: Set(created_by),
            device_id: Set(req.device_id),
            school_id: Set(req.school_id),
            name: Set(req.name),
            zone_type: Set(req.zone_type.to_string()),
            latitude: Set(req.latitude),
            longitude: Set(req.longitude),
            radius_m: Set(req.radius_m),
            notify_on_entry: Set(req.notify_on_entry),
            notify_on_exit: Set(req.notify_on_exit),
            allowed_time_start: Set(req.allowed_time_start.as_deref().map(canonical_hhmm)),
            allowed_time_end: Set(req.allowed_time_end.as_deref().map(canonical_hhmm)),
            allowed_days: Set(to_json_list(&req.allowed_days)),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建安全区域失败: {e}")))?;

        Ok(result.into_zone())
    }

    pub async fn get_zone_by_id_impl(&self, id: i64) -> Result<Option<SafeZone>> {
        let result = Zones::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询安全区域失败: {e}")))?;

        Ok(result.map(|m| m.into_zone()))
    }

    /// 设备自身的区域与所属学校的区域取并集；两者都为空时返回全部
    pub async fn list_zones_impl(&self, filter: ZoneFilter) -> Result<Vec<SafeZone>> {
        let mut select = Zones::find();

        if !filter.device_ids.is_empty() || filter.school_id.is_some() {
            let mut scope = Condition::any();
            if !filter.device_ids.is_empty() {
                scope = scope.add(ZoneColumn::DeviceId.is_in(filter.device_ids));
            }
            if let Some(school_id) = filter.school_id {
                scope = scope.add(ZoneColumn::SchoolId.eq(school_id));
            }
            select = select.filter(scope);
        }
        if filter.active_only {
            select = select.filter(ZoneColumn::IsActive.eq(true));
        }

        let zones = select
            .order_by_asc(ZoneColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询安全区域失败: {e}")))?;

        Ok(zones.into_iter().map(|m| m.into_zone()).collect())
    }

    pub async fn update_zone_impl(
        &self,
        id: i64,
        update: UpdateSafeZoneRequest,
    ) -> Result<Option<SafeZone>> {
        let Some(existing) = Zones::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询安全区域失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ZoneActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(latitude) = update.latitude {
            model.latitude = Set(latitude);
        }
        if let Some(longitude) = update.longitude {
            model.longitude = Set(longitude);
        }
        if let Some(radius) = update.radius_m {
            model.radius_m = Set(radius);
        }
        if let Some(flag) = update.notify_on_entry {
            model.notify_on_entry = Set(flag);
        }
        if let Some(flag) = update.notify_on_exit {
            model.notify_on_exit = Set(flag);
        }
        if let Some(start) = update.allowed_time_start {
            model.allowed_time_start = Set(Some(canonical_hhmm(&start)));
        }
        if let Some(end) = update.allowed_time_end {
            model.allowed_time_end = Set(Some(canonical_hhmm(&end)));
        }
        if let Some(days) = update.allowed_days {
            model.allowed_days = Set(to_json_list(&days));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("更新安全区域失败: {e}")))?;

        Ok(Some(updated.into_zone()))
    }

    pub async fn delete_zone_impl(&self, id: i64) -> Result<bool> {
        let result = Zones::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("删除安全区域失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_zone_statuses_impl(&self, device_id: i64) -> Result<Vec<ZoneStatus>> {
        let statuses = ZoneStatuses::find()
            .filter(ZoneStatusColumn::DeviceId.eq(device_id))
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询区域状态失败: {e}")))?;

        Ok(statuses.into_iter().map(|m| m.into_zone_status()).collect())
    }

    pub async fn upsert_zone_status_impl(
        &self,
        device_id: i64,
        zone_id: i64,
        is_inside: bool,
        schedule_alerted: bool,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let existing = ZoneStatuses::find_by_id((device_id, zone_id))
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询区域状态失败: {e}")))?;

        match existing {
            Some(existing) => {
                let mut model: ZoneStatusActiveModel = existing.into();
                model.is_inside = Set(is_inside);
                model.schedule_alerted = Set(schedule_alerted);
                model.updated_at = Set(now);
                model.update(&self.db).await.map(|_| ())
            }
            None => ZoneStatusActiveModel {
                device_id: Set(device_id),
                zone_id: Set(zone_id),
                is_inside: Set(is_inside),
                schedule_alerted: Set(schedule_alerted),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        }
        .map_err(|e| EducafricError::database_operation(format!("保存区域状态失败: {e}")))
    }

    pub async fn create_alert_impl(&self, alert: NewLocationAlert) -> Result<LocationAlert> {
        let model = AlertActiveModel {
            device_id: Set(alert.device_id),
            student_id: Set(alert.student_id),
            zone_id: Set(alert.zone_id),
            alert_type: Set(alert.alert_type.to_string()),
            severity: Set(alert.severity.to_string()),
            message: Set(alert.message),
            latitude: Set(alert.latitude),
            longitude: Set(alert.longitude),
            is_resolved: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("创建告警失败: {e}")))?;

        Ok(result.into_alert())
    }

    pub async fn get_alert_by_id_impl(&self, id: i64) -> Result<Option<LocationAlert>> {
        let result = Alerts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询告警失败: {e}")))?;

        Ok(result.map(|m| m.into_alert()))
    }

    pub async fn list_alerts_impl(
        &self,
        device_ids: &[i64],
        unresolved_only: bool,
    ) -> Result<Vec<LocationAlert>> {
        if device_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = Alerts::find().filter(AlertColumn::DeviceId.is_in(device_ids.to_vec()));
        if unresolved_only {
            select = select.filter(AlertColumn::IsResolved.eq(false));
        }

        let alerts = select
            .order_by_desc(AlertColumn::CreatedAt)
            .order_by_desc(AlertColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询告警列表失败: {e}")))?;

        Ok(alerts.into_iter().map(|m| m.into_alert()).collect())
    }

    /// 处理告警，已处理的告警保持原样
    pub async fn resolve_alert_impl(
        &self,
        id: i64,
        resolved_by: i64,
    ) -> Result<Option<LocationAlert>> {
        let Some(existing) = Alerts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询告警失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.is_resolved {
            return Ok(Some(existing.into_alert()));
        }

        let mut model: AlertActiveModel = existing.into();
        model.is_resolved = Set(true);
        model.resolved_by = Set(Some(resolved_by));
        model.resolved_at = Set(Some(chrono::Utc::now().timestamp()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("处理告警失败: {e}")))?;

        Ok(Some(updated.into_alert()))
    }

    pub async fn count_unresolved_alerts_impl(&self, device_id: i64) -> Result<u64> {
        Alerts::find()
            .filter(AlertColumn::DeviceId.eq(device_id))
            .filter(AlertColumn::IsResolved.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("统计告警失败: {e}")))
    }
}
