use std::str::FromStr;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        AdminSettingsListResponse, KnownSettingKey, SettingAuditQuery, SettingResponse,
        UpdateSettingRequest,
    },
};
use crate::services::common::{ApiError, client_ip, current_user};
use crate::services::system::DynamicConfig;

/// 获取所有管理员配置
pub async fn get_admin_settings(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let settings = storage.list_all_settings().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AdminSettingsListResponse { settings },
        "Admin settings retrieved successfully",
    )))
}

/// 更新单个配置，校验通过后写入数据库并刷新动态配置缓存
pub async fn update_setting(
    service: &AdminService,
    request: &HttpRequest,
    key: String,
    body: UpdateSettingRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    let known = KnownSettingKey::from_str(&key)
        .map_err(|msg| ApiError::not_found(ErrorCode::SettingNotFound, msg))?;
    known
        .validate(&body.value)
        .map_err(|msg| ApiError::bad_request(ErrorCode::SettingInvalidValue, msg))?;

    let storage = service.get_storage(request)?;
    if storage.get_setting(&key).await?.is_none() {
        return Err(ApiError::not_found(ErrorCode::SettingNotFound, "Setting not found").into());
    }

    let setting = storage
        .update_setting(&key, &body.value, user.id, client_ip(request))
        .await?;
    DynamicConfig::update(&key, &body.value).await;

    info!("Setting {} updated by user {}", key, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingResponse { setting },
        "Setting updated successfully",
    )))
}

/// 获取审计日志
pub async fn get_setting_audits(
    service: &AdminService,
    request: &HttpRequest,
    query: SettingAuditQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let audits = storage.list_setting_audits(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        audits,
        "Setting audits retrieved successfully",
    )))
}
