use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::SandboxService;
use super::seed::demo_email;
use crate::config::AppConfig;
use crate::models::sandbox::SandboxLoginRequest;
use crate::models::users::UserStatus;
use crate::models::ErrorCode;
use crate::services::auth::login::issue_tokens;
use crate::services::common::{ApiError, client_ip};

/// 以演示账号免密登录
pub async fn login(
    service: &SandboxService,
    request: &HttpRequest,
    login_request: SandboxLoginRequest,
) -> ActixResult<HttpResponse> {
    let config = &AppConfig::get().sandbox;
    if !config.enabled {
        return Err(
            ApiError::not_found(ErrorCode::SandboxDisabled, "Sandbox mode is disabled").into(),
        );
    }

    let storage = service.get_storage(request)?;
    let role = login_request.role;
    let email = demo_email(role, &config.email_domain);

    let user = storage
        .get_user_by_email(&email)
        .await?
        .filter(|u| u.is_test_account && u.status == UserStatus::Active && u.has_role(role))
        .ok_or_else(|| {
            warn!(
                "Sandbox login for {} refused from {:?}",
                role,
                client_ip(request)
            );
            ApiError::not_found(
                ErrorCode::UserNotFound,
                format!("No demo account for role '{role}'"),
            )
        })?;

    storage.update_last_login(user.id).await?;
    info!("Sandbox login as {} (user {})", role, user.id);

    let mut user = user;
    user.active_role = role;
    issue_tokens(user, None, "Sandbox login successful").await
}
