use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::auth::RegisterRequest;
use crate::models::users::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::ApiError;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_phone, validate_email, validate_name, validate_password, validate_phone};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let email = register_request.email.trim().to_lowercase();

    // 1. 基本字段校验
    validate_email(&email)
        .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    validate_name(&register_request.first_name)
        .and_then(|_| validate_name(&register_request.last_name))
        .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    if let Some(phone) = &register_request.phone {
        validate_phone(phone)
            .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    // 2. 只有部分角色可以自助注册
    if !register_request.role.is_self_registrable() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::RegistrationFailed,
            format!("Role '{}' cannot self-register", register_request.role),
        )));
    }

    // 3. 密码策略
    if let Err(reason) = validate_password(&register_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            reason,
        )));
    }

    let storage = service.get_storage(request)?;

    // 4. 邮箱唯一
    if storage.get_user_by_email(&email).await?.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )));
    }

    // 5. 只有家长可以自选学校，其余角色由校长在校内创建或关联
    let school_id = register_request
        .school_id
        .filter(|_| register_request.role.keeps_school_on_signup());
    if let Some(school_id) = school_id
        && storage.get_school_by_id(school_id).await?.is_none()
    {
        return Err(ApiError::not_found(ErrorCode::SchoolNotFound, "School not found").into());
    }

    let password_hash = hash_password(&register_request.password)?;
    let phone = register_request.phone.as_deref().map(normalize_phone);

    let user = storage
        .create_user(CreateUserRequest {
            email,
            password_hash,
            first_name: register_request.first_name.trim().to_string(),
            last_name: register_request.last_name.trim().to_string(),
            role: register_request.role,
            secondary_roles: Vec::new(),
            school_id,
            phone,
            whatsapp_number: None,
            preferred_language: register_request
                .preferred_language
                .unwrap_or_else(|| "fr".to_string()),
            is_test_account: false,
        })
        .await?;

    info!("User {} registered as {}", user.id, user.role);
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
}
