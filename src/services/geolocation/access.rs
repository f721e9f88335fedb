//! 设备与区域的访问范围
//!
//! - 学生本人、关联家长可访问学生的设备
//! - 同校教职员工可访问本校设备
//! - 平台管理员不受限

use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::geolocation::{SafeZone, TrackedDevice};
use crate::models::users::{User, UserRole};
use crate::services::common::ApiError;
use crate::storage::Storage;

fn is_school_staff(user: &User, school_id: Option<i64>) -> bool {
    school_id.is_some()
        && user.school_id == school_id
        && UserRole::staff_roles().contains(&&user.active_role)
}

pub(crate) async fn can_access_student(
    storage: &Arc<dyn Storage>,
    user: &User,
    student_id: i64,
    school_id: Option<i64>,
) -> Result<bool, ApiError> {
    if user.is_platform_admin() || user.id == student_id || is_school_staff(user, school_id) {
        return Ok(true);
    }
    if user.active_role == UserRole::Parent {
        return Ok(storage
            .get_parent_student_relation(user.id, student_id)
            .await?
            .is_some());
    }
    Ok(false)
}

/// 获取设备；无权访问时按不存在处理
pub(crate) async fn load_device(
    storage: &Arc<dyn Storage>,
    user: &User,
    device_id: i64,
) -> Result<TrackedDevice, ApiError> {
    let not_found = || ApiError::not_found(ErrorCode::DeviceNotFound, "Device not found");
    let device = storage
        .get_device_by_id(device_id)
        .await?
        .ok_or_else(not_found)?;
    if can_access_student(storage, user, device.student_id, device.school_id).await? {
        Ok(device)
    } else {
        Err(not_found())
    }
}

/// 当前用户可见的设备
pub(crate) async fn visible_devices(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Vec<TrackedDevice>, ApiError> {
    let devices = match user.active_role {
        UserRole::Parent => {
            let ids: Vec<i64> = storage
                .list_children(user.id)
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            storage.list_devices_for_students(&ids).await?
        }
        UserRole::Student => storage.list_devices_for_students(&[user.id]).await?,
        _ => match user.school_id {
            Some(school_id) if is_school_staff(user, Some(school_id)) => {
                storage.list_devices_for_school(school_id).await?
            }
            _ => Vec::new(),
        },
    };
    Ok(devices)
}

/// 区域修改权限：创建者、可访问所绑设备者、或学校区域的本校教职员工
pub(crate) async fn load_zone_for_update(
    storage: &Arc<dyn Storage>,
    user: &User,
    zone_id: i64,
) -> Result<SafeZone, ApiError> {
    let not_found = || ApiError::not_found(ErrorCode::ZoneNotFound, "Zone not found");
    let zone = storage.get_zone_by_id(zone_id).await?.ok_or_else(not_found)?;

    if user.is_platform_admin() || zone.created_by == user.id {
        return Ok(zone);
    }
    if let Some(device_id) = zone.device_id
        && load_device(storage, user, device_id).await.is_ok()
    {
        return Ok(zone);
    }
    if zone.device_id.is_none() && is_school_staff(user, zone.school_id) {
        return Ok(zone);
    }
    Err(not_found())
}
