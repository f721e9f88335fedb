use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::users::{User, UserStatus};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::system::DynamicConfig;
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Email or password is incorrect";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let email = login_request.email.trim().to_lowercase();

    // 1. 根据邮箱获取用户；未知邮箱与密码错误返回同样的信息
    let user = match storage.get_user_by_email(&email).await? {
        Some(user) if verify_password(&login_request.password, &user.password_hash) => user,
        _ => {
            warn!("Failed login attempt for {}", email);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                INVALID_CREDENTIALS,
            )));
        }
    };

    // 2. 停用或暂停的账户
    if user.status != UserStatus::Active {
        info!("Login rejected for inactive account {}", user.id);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is not active",
        )));
    }

    // 3. 更新最后登录时间
    storage.update_last_login(user.id).await?;

    let refresh_expiry = if login_request.remember_me {
        Some(chrono::Duration::days(
            DynamicConfig::refresh_token_remember_me_expiry().await,
        ))
    } else {
        None
    };
    issue_tokens(user, refresh_expiry, "Login successful").await
}

/// 生成令牌对并写入 refresh cookie，登录、切换角色与沙盒登录共用
pub(crate) async fn issue_tokens(
    user: User,
    refresh_expiry: Option<chrono::Duration>,
    message: &str,
) -> ActixResult<HttpResponse> {
    let token_pair = match user.generate_token_pair(refresh_expiry) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            );
        }
    };

    info!("User {} authenticated as {}", user.id, user.active_role);

    let expires_in = DynamicConfig::access_token_expiry().await * 60;
    let response = LoginResponse::new(token_pair.access_token, expires_in, user);
    let refresh_cookie =
        jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_expiry);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, message)))
}
