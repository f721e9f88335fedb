use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::sync::Arc;
use tracing::{error, warn};

use super::{FileService, stored_path};
use crate::config::AppConfig;
use crate::errors::EducafricError;
use crate::models::files::File;
use crate::models::users::{User, UserRole};
use crate::models::ErrorCode;
use crate::services::common::{ApiError, current_user};
use crate::storage::Storage;

fn is_staff(user: &User) -> bool {
    UserRole::staff_roles().contains(&&user.active_role)
}

/// 上传者本人、同校教职员工、上传学生的关联家长可以下载
async fn can_download(storage: &Arc<dyn Storage>, user: &User, file: &File) -> ActixResult<bool> {
    if file.uploader_id == user.id || user.is_platform_admin() {
        return Ok(true);
    }
    if let Some(school_id) = file.school_id
        && is_staff(user)
        && user.school_id == Some(school_id)
    {
        return Ok(true);
    }
    if user.active_role == UserRole::Parent {
        return Ok(storage
            .get_parent_student_relation(user.id, file.uploader_id)
            .await?
            .is_some());
    }
    Ok(false)
}

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let file = storage
        .get_file_by_token(&file_token)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::FileNotFound, "File not found"))?;

    if !can_download(&storage, &user, &file).await? {
        warn!("User {} denied download of file {}", user.id, file.file_token);
        // 不暴露文件是否存在
        return Err(ApiError::not_found(ErrorCode::FileNotFound, "File not found").into());
    }

    let file_path = stored_path(&AppConfig::get().upload.dir, &file.file_token);
    let bytes = match std::fs::read(&file_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("File {} is missing on disk", file.file_token);
            return Err(ApiError::not_found(ErrorCode::FileNotFound, "File not found").into());
        }
        Err(e) => return Err(EducafricError::file_operation(format!("{e}")).into()),
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.file_type.clone()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name.replace('"', "")),
        ))
        .body(bytes))
}
