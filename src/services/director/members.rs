use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectorService;
use crate::models::classes::{CreateMemberRequest, CreateMemberResponse, StudentListQuery};
use crate::models::users::{CreateUserRequest, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, load_class, require_school};
use crate::utils::password::{generate_temporary_password, hash_password};
use crate::utils::validate::{normalize_phone, validate_email, validate_name, validate_phone};

/// 创建本校教师、学生或家长账户，临时密码只在响应中出现一次
pub async fn create_member(
    service: &DirectorService,
    request: &HttpRequest,
    member: CreateMemberRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;

    if !matches!(
        member.role,
        UserRole::Teacher | UserRole::Student | UserRole::Parent
    ) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Only teacher, student or parent accounts can be created",
        )
        .into());
    }

    let email = member.email.trim().to_lowercase();
    validate_email(&email).map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    validate_name(&member.first_name)
        .and_then(|_| validate_name(&member.last_name))
        .map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    for phone in [&member.phone, &member.whatsapp_number].into_iter().flatten() {
        validate_phone(phone).map_err(|msg| ApiError::bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let storage = service.get_storage(request)?;
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(ErrorCode::UserAlreadyExists, "Email already exists").into());
    }

    let temporary_password = generate_temporary_password();
    let created = storage
        .create_user(CreateUserRequest {
            email,
            password_hash: hash_password(&temporary_password)?,
            first_name: member.first_name.trim().to_string(),
            last_name: member.last_name.trim().to_string(),
            role: member.role,
            secondary_roles: Vec::new(),
            school_id: Some(school_id),
            phone: member.phone.as_deref().map(normalize_phone),
            whatsapp_number: member.whatsapp_number.as_deref().map(normalize_phone),
            preferred_language: "fr".to_string(),
            is_test_account: false,
        })
        .await?;

    info!(
        "Member {} ({}) created in school {} by {}",
        created.id, created.role, school_id, user.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateMemberResponse {
            user: created,
            temporary_password,
        },
        "Member created successfully",
    )))
}

pub async fn list_teachers(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let teachers = storage
        .list_school_users(school_id, Some(UserRole::Teacher))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(teachers, "Teachers retrieved")))
}

pub async fn list_students(
    service: &DirectorService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let students = match query.class_id {
        Some(class_id) => {
            let class = load_class(&storage, &user, class_id).await?;
            storage.list_class_students(class.id).await?
        }
        None => {
            storage
                .list_school_users(school_id, Some(UserRole::Student))
                .await?
        }
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Students retrieved")))
}
