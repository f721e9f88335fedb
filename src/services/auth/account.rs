use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::auth::{ChangePasswordRequest, SwitchRoleRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::services::notifications::preferences::evict_cached_user;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;
use super::login::issue_tokens;

/// 切换活动角色，返回绑定新角色的令牌对
pub async fn handle_switch_role(
    service: &AuthService,
    switch_request: SwitchRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut user = current_user(request)?;
    let role = switch_request.role;

    if !user.has_role(role) {
        warn!("User {} tried to switch to unassigned role {}", user.id, role);
        return Err(ApiError::forbidden(
            ErrorCode::RoleNotAssigned,
            format!("Role '{role}' is not assigned to this account"),
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    storage.set_active_role(user.id, role).await?;
    evict_cached_user(request).await;

    user.active_role = role;
    issue_tokens(user, None, "Role switched successfully").await
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 缓存中的用户不含密码哈希，需要重新读取
    let stored = storage
        .get_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    if !verify_password(&change_request.current_password, &stored.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    if let Err(reason) = validate_password(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            reason,
        )));
    }

    let password_hash = hash_password(&change_request.new_password)?;
    storage.update_password(user.id, &password_hash).await?;

    info!("User {} changed password", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Password changed successfully",
    )))
}
