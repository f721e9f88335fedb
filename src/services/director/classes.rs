use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::DirectorService;
use crate::models::classes::{CreateClassRequest, UpdateClassRequest};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, load_class, load_school_member, require_school};
use crate::storage::Storage;

const MAX_CLASS_SIZE: i32 = 200;

fn validate_capacity(max_students: i32) -> Result<(), ApiError> {
    if (1..=MAX_CLASS_SIZE).contains(&max_students) {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("max_students must be between 1 and {MAX_CLASS_SIZE}"),
        ))
    }
}

// 班级名称在学校内唯一
async fn ensure_name_available(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    name: &str,
    current_id: Option<i64>,
) -> ActixResult<()> {
    match storage.get_class_by_name(school_id, name).await? {
        Some(existing) if Some(existing.id) != current_id => Err(ApiError::conflict(
            ErrorCode::ClassAlreadyExists,
            format!("Class '{name}' already exists"),
        )
        .into()),
        _ => Ok(()),
    }
}

pub async fn create_class(
    service: &DirectorService,
    request: &HttpRequest,
    mut class: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;

    class.name = class.name.trim().to_string();
    if class.name.is_empty() || class.level.trim().is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Class name and level are required",
        )
        .into());
    }
    validate_capacity(class.max_students)?;
    class.school_id = school_id;

    let storage = service.get_storage(request)?;
    ensure_name_available(&storage, school_id, &class.name, None).await?;
    if let Some(teacher_id) = class.teacher_id {
        load_school_member(&storage, school_id, teacher_id, UserRole::Teacher).await?;
    }

    let created = storage.create_class(class).await?;
    info!("Class {} created in school {}", created.name, school_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Class created successfully")))
}

pub async fn list_classes(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let classes = storage.list_classes(school_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "Classes retrieved")))
}

pub async fn update_class(
    service: &DirectorService,
    request: &HttpRequest,
    class_id: i64,
    mut update: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;

    if let Some(max_students) = update.max_students {
        validate_capacity(max_students)?;
    }
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        ensure_name_available(&storage, class.school_id, &name, Some(class.id)).await?;
        update.name = Some(name);
    }
    if let Some(teacher_id) = update.teacher_id {
        load_school_member(&storage, class.school_id, teacher_id, UserRole::Teacher).await?;
    }

    let updated = storage
        .update_class(class.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Class updated successfully")))
}

pub async fn delete_class(
    service: &DirectorService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, &user, class_id).await?;

    storage.delete_class(class.id).await?;
    info!("Class {} deleted by {}", class.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Class deleted successfully")))
}
