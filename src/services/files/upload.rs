use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::{fs::File, path::Path};
use tracing::{error, info};
use uuid::Uuid;

use super::{FileService, stored_path};
use crate::config::AppConfig;
use crate::errors::EducafricError;
use crate::models::files::{FileUploadResponse, NewFile};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};
use crate::services::system::DynamicConfig;
use crate::utils::validate_magic_bytes;

fn upload_failed(detail: impl std::fmt::Display) -> ApiError {
    error!("{}", EducafricError::file_operation(detail.to_string()));
    ApiError::new(
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::FileUploadFailed,
        "File upload failed",
    )
}

/// 取小写扩展名（带点）
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub async fn handle_upload(
    service: &FileService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    let upload_dir = &AppConfig::get().upload.dir;
    let max_size = DynamicConfig::upload_max_size().await;
    let allowed_types = DynamicConfig::upload_allowed_types().await;

    if !Path::new(upload_dir).exists() {
        fs::create_dir_all(upload_dir).map_err(upload_failed)?;
    }

    let file_token = Uuid::new_v4().simple().to_string();
    let file_path = stored_path(upload_dir, &file_token);

    let mut original_name = String::new();
    let mut file_type = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if file_uploaded {
            let _ = fs::remove_file(&file_path);
            return Err(ApiError::bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            )
            .into());
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let extension = extension_of(&original_name);
        if !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
            return Err(ApiError::bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            )
            .into());
        }

        // MIME 类型只做记录
        file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut f = File::create(&file_path).map_err(upload_failed)?;
        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = chunk?;

            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Err(ApiError::bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    )
                    .into());
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Err(ApiError::bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                )
                .into());
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                return Err(upload_failed(e).into());
            }
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Err(ApiError::bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let created = match storage
        .create_file(NewFile {
            file_token: file_token.clone(),
            file_name: original_name,
            file_size,
            file_type,
            uploader_id: user.id,
            school_id: user.school_id,
        })
        .await
    {
        Ok(file) => file,
        Err(e) => {
            let _ = fs::remove_file(&file_path);
            return Err(e.into());
        }
    };

    info!(
        "File {} uploaded by user {} ({} bytes)",
        created.file_token, user.id, created.file_size
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        FileUploadResponse {
            file_token: created.file_token,
            file_name: created.file_name,
            size: created.file_size,
            content_type: created.file_type,
            uploaded_at: created.uploaded_at,
        },
        "File uploaded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Devoir.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
    }
}
