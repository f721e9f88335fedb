use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::auth::RefreshTokenResponse;
use crate::models::users::{UserResponse, UserRole, UserStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::current_user;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn refresh_rejected(message: &str) -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(refresh_rejected(
                "Login expired or invalid, please login again",
            ));
        }
    };

    // 用户仍须存在、处于激活状态并拥有 token 中的角色
    let storage = service.get_storage(request)?;
    let user = match claims.sub.parse::<i64>() {
        Ok(id) => storage.get_user_by_id(id).await?,
        Err(_) => None,
    };
    let still_valid = user.as_ref().is_some_and(|u| {
        u.status == UserStatus::Active
            && claims
                .role
                .parse::<UserRole>()
                .is_ok_and(|role| u.has_role(role))
    });
    if !still_valid {
        return Ok(refresh_rejected(
            "Login expired or invalid, please login again",
        ));
    }

    match JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: service.get_config().jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            info!("Refresh token failed: {}", e);
            Ok(refresh_rejected(
                "Login expired or invalid, please login again",
            ))
        }
    }
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse::from(user),
        "User information retrieved successfully",
    )))
}
